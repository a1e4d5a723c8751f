//! Run-tracking port trait
//!
//! Defines the interface for reading runs from an experiment tracker.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::entities::{RunOrdering, RunRecord};
use crate::error::RunTrackerError;

/// Account the API key authenticated as
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerAccount {
    pub username: Option<String>,
    pub entity: Option<String>,
}

/// Port trait for run-tracker operations
#[async_trait]
pub trait RunTracker: Send + Sync {
    /// Verify the configured API key
    async fn authenticate(&self) -> Result<TrackerAccount, RunTrackerError>;

    /// List every run of `entity/project`, ordered by the tracker using `ordering`
    async fn list_runs(
        &self,
        entity: &str,
        project: &str,
        ordering: &RunOrdering,
    ) -> Result<Vec<RunRecord>, RunTrackerError>;

    /// Fetch up to `samples` sampled history rows of a run
    async fn run_history(
        &self,
        entity: &str,
        project: &str,
        run_id: &str,
        samples: u32,
    ) -> Result<Vec<Map<String, Value>>, RunTrackerError>;
}
