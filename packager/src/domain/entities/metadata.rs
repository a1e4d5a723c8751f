//! Model metadata entity

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Summary of a trained model submitted alongside the code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub parameter_count: u64,
    pub model_architecture: String,
}

impl ModelMetadata {
    /// File name for metadata generated at `at`, e.g. `model_metadata_2026-01-11_23-59.json`
    pub fn file_name(at: DateTime<Local>) -> String {
        format!("model_metadata_{}.json", at.format("%Y-%m-%d_%H-%M"))
    }
}
