//! Domain layer
//!
//! Contains pure business logic with no external dependencies.
//! - `entities`: Domain models for runs, submissions and scores
//! - `ports`: Trait definitions for external services
//! - `selection`: Best-run and best-score selection

pub mod entities;
pub mod ports;
pub mod selection;
