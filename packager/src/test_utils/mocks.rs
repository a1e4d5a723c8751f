//! Mock implementations of port traits
//!
//! In-memory implementations configured per test. They record the calls
//! tests assert on.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::entities::{RunOrdering, RunRecord, SubmissionRecord};
use crate::domain::ports::{
    DeliveryReceipt, FileDelivery, Leaderboard, RunTracker, TrackerAccount,
};
use crate::error::{LeaderboardError, RunTrackerError};

use super::fixtures::test_history_rows;

// ============================================================================
// Run tracker
// ============================================================================

#[derive(Default)]
pub struct MockRunTracker {
    runs: Arc<RwLock<Vec<RunRecord>>>,
    failing_history: Arc<RwLock<HashSet<String>>>,
    reject_key: bool,
    /// Ordering keys passed to `list_runs`, in call order
    pub orderings: Arc<RwLock<Vec<String>>>,
}

impl MockRunTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracker that rejects the API key
    pub fn unauthorized() -> Self {
        Self {
            reject_key: true,
            ..Self::default()
        }
    }

    pub fn with_runs(self, runs: Vec<RunRecord>) -> Self {
        *self.runs.write().unwrap() = runs;
        self
    }

    /// Make history fetches for `run_id` fail
    pub fn with_failing_history(self, run_id: &str) -> Self {
        self.failing_history
            .write()
            .unwrap()
            .insert(run_id.to_string());
        self
    }
}

#[async_trait]
impl RunTracker for MockRunTracker {
    async fn authenticate(&self) -> Result<TrackerAccount, RunTrackerError> {
        if self.reject_key {
            return Err(RunTrackerError::Unauthorized);
        }
        Ok(TrackerAccount {
            username: Some("student".to_string()),
            entity: Some("student".to_string()),
        })
    }

    async fn list_runs(
        &self,
        _entity: &str,
        _project: &str,
        ordering: &RunOrdering,
    ) -> Result<Vec<RunRecord>, RunTrackerError> {
        if self.reject_key {
            return Err(RunTrackerError::Unauthorized);
        }
        self.orderings.write().unwrap().push(ordering.order_key());
        Ok(self.runs.read().unwrap().clone())
    }

    async fn run_history(
        &self,
        _entity: &str,
        _project: &str,
        run_id: &str,
        samples: u32,
    ) -> Result<Vec<Map<String, Value>>, RunTrackerError> {
        if self.failing_history.read().unwrap().contains(run_id) {
            return Err(RunTrackerError::Api {
                status: 500,
                message: "history backend unavailable".to_string(),
            });
        }
        Ok(test_history_rows(samples.min(3) as usize))
    }
}

// ============================================================================
// Leaderboard
// ============================================================================

pub struct MockLeaderboard {
    submissions: Arc<RwLock<Vec<SubmissionRecord>>>,
    user_exists: bool,
    reject_credentials: bool,
    /// Last `(username, key)` passed to `store_credentials`
    pub stored_credentials: Arc<RwLock<Option<(String, String)>>>,
    /// Competitions queried through `list_submissions`, in call order
    pub competitions: Arc<RwLock<Vec<String>>>,
}

impl Default for MockLeaderboard {
    fn default() -> Self {
        Self {
            submissions: Arc::default(),
            user_exists: true,
            reject_credentials: false,
            stored_credentials: Arc::default(),
            competitions: Arc::default(),
        }
    }
}

impl MockLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A leaderboard that rejects the stored credentials
    pub fn unauthorized() -> Self {
        Self {
            reject_credentials: true,
            ..Self::default()
        }
    }

    pub fn with_submissions(self, submissions: Vec<SubmissionRecord>) -> Self {
        *self.submissions.write().unwrap() = submissions;
        self
    }

    pub fn with_user_exists(mut self, exists: bool) -> Self {
        self.user_exists = exists;
        self
    }
}

#[async_trait]
impl Leaderboard for MockLeaderboard {
    async fn store_credentials(&self, username: &str, key: &str) -> Result<(), LeaderboardError> {
        *self.stored_credentials.write().unwrap() = Some((username.to_string(), key.to_string()));
        Ok(())
    }

    async fn user_exists(&self, _username: &str) -> Result<bool, LeaderboardError> {
        Ok(self.user_exists)
    }

    async fn authenticate(&self) -> Result<(), LeaderboardError> {
        if self.reject_credentials {
            return Err(LeaderboardError::Unauthorized);
        }
        Ok(())
    }

    async fn list_submissions(
        &self,
        competition: &str,
    ) -> Result<Vec<SubmissionRecord>, LeaderboardError> {
        self.competitions
            .write()
            .unwrap()
            .push(competition.to_string());
        Ok(self.submissions.read().unwrap().clone())
    }
}

// ============================================================================
// Delivery
// ============================================================================

#[derive(Default)]
pub struct RecordingDelivery {
    /// Paths handed to `deliver`, in call order
    pub delivered: Arc<RwLock<Vec<PathBuf>>>,
}

impl RecordingDelivery {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileDelivery for RecordingDelivery {
    fn deliver(&self, path: &Path) -> DeliveryReceipt {
        self.delivered.write().unwrap().push(path.to_path_buf());
        DeliveryReceipt {
            host: "test",
            path: path.to_path_buf(),
            instructions: Vec::new(),
        }
    }
}
