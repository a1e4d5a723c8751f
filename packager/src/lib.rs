//! Course submission packager
//!
//! Collects the artifacts of a course assignment submission, checks them
//! against the student's configuration and bundles them into one archive.
//!
//! Layout:
//! - `domain`: entities, port traits and the pure selection rules
//! - `adapters`: W&B, Kaggle and host-environment implementations of the ports
//! - `app`: the packaging pipeline
//! - `config`: environment-driven configuration

pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;

pub use app::{PackageReport, PackagerService};
pub use config::{AssignmentSettings, ServiceEndpoints, SubmissionConfig};
pub use error::PackagingError;

#[cfg(test)]
mod test_utils;
