//! Host environment adapter
//!
//! Detects the notebook host once and delivers files the way that host allows.

pub mod environment;

pub use environment::HostEnvironment;
