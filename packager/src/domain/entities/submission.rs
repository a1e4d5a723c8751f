//! Leaderboard submission entity

use serde::{Deserialize, Serialize};

/// A scored leaderboard entry, read-only to the packager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub private_score: Option<f64>,
    pub public_score: Option<f64>,
    pub submitted_by: String,
    /// Username reference of the submitter, when the service reports one
    pub submitted_by_ref: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}

impl SubmissionRecord {
    /// Whether this submission was made by `username`
    pub fn is_by(&self, username: &str) -> bool {
        self.submitted_by == username || self.submitted_by_ref.as_deref() == Some(username)
    }
}
