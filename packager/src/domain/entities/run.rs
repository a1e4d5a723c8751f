//! Run domain entity
//!
//! A run is one recorded training/evaluation execution in the run tracker.
//! Runs are read-only to the packager.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::direction::{Direction, DESCENDING};

/// Number of history rows requested per exported run
pub const HISTORY_SAMPLES: u32 = 1000;

/// A run as reported by the run-tracking service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: String,
    pub name: String,
    pub tags: Vec<String>,
    pub state: String,
    pub created_at: String,
    pub config: Map<String, Value>,
    pub summary: Map<String, Value>,
    pub history: Option<RunHistory>,
}

impl RunRecord {
    /// Numeric value of a summary metric, if logged
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.summary.get(name).and_then(Value::as_f64)
    }
}

/// Sampled time-series history of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunHistory {
    Rows(Vec<Map<String, Value>>),
    /// History could not be fetched; holds the failure text
    Unavailable(String),
}

impl RunHistory {
    pub fn unavailable(reason: impl std::fmt::Display) -> Self {
        RunHistory::Unavailable(format!("Failed to fetch history: {}", reason))
    }
}

/// Ordering hint passed to the run tracker when listing runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOrdering {
    pub metric: String,
    pub direction: Direction,
}

impl RunOrdering {
    pub fn new(metric: impl Into<String>, direction: Direction) -> Self {
        Self {
            metric: metric.into(),
            direction,
        }
    }

    /// Server-side order key, e.g. `-summary_metrics.EER`
    ///
    /// The `-` prefix is emitted only for the literal `descending` label.
    pub fn order_key(&self) -> String {
        let prefix = if self.direction.label() == DESCENDING {
            "-"
        } else {
            ""
        };
        format!("{}summary_metrics.{}", prefix, self.metric)
    }
}

/// One entry of the exported top-N runs file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedRun {
    pub id: String,
    pub name: String,
    pub tags: Vec<String>,
    pub state: String,
    pub created_at: String,
    pub config: Map<String, Value>,
    pub summary: Map<String, Value>,
    pub history: RunHistory,
}

impl ExportedRun {
    pub fn new(run: RunRecord, history: RunHistory) -> Self {
        Self {
            id: run.id,
            name: run.name,
            tags: run.tags,
            state: run.state,
            created_at: run.created_at,
            config: run.config,
            summary: run.summary,
            history,
        }
    }
}
