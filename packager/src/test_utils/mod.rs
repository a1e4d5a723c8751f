//! Test utilities
//!
//! Manual mock implementations of the port traits plus fixture builders.
//! Mocks record the calls tests want to assert on.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
