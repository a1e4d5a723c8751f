//! Application layer
//!
//! Contains the packaging use cases.
//! The service coordinates domain selection, ports and local artifact files.

pub mod archive;
pub mod artifacts;
pub mod packager_service;

pub use archive::{assemble_archive, ArchiveReport};
pub use packager_service::{PackageReport, PackagerService};
