//! Leaderboard port trait
//!
//! Defines the interface for reading competition submissions.

use async_trait::async_trait;

use crate::domain::entities::SubmissionRecord;
use crate::error::LeaderboardError;

/// Port trait for leaderboard operations
#[async_trait]
pub trait Leaderboard: Send + Sync {
    /// Persist credentials where `authenticate` will read them
    async fn store_credentials(&self, username: &str, key: &str) -> Result<(), LeaderboardError>;

    /// Check whether a public profile exists for `username`
    async fn user_exists(&self, username: &str) -> Result<bool, LeaderboardError>;

    /// Load the stored credentials for subsequent calls
    async fn authenticate(&self) -> Result<(), LeaderboardError>;

    /// List the authenticated account's submissions to `competition`
    async fn list_submissions(
        &self,
        competition: &str,
    ) -> Result<Vec<SubmissionRecord>, LeaderboardError>;
}
