//! File delivery port
//!
//! Hands a produced file to the user in whatever way the host supports.

use std::path::{Path, PathBuf};

/// What a delivery did, for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub host: &'static str,
    pub path: PathBuf,
    /// Steps the user still has to take, if any
    pub instructions: Vec<String>,
}

/// Port trait for delivering a local file to the user
pub trait FileDelivery: Send + Sync {
    fn deliver(&self, path: &Path) -> DeliveryReceipt;
}
