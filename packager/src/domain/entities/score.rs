//! Score entities
//!
//! `ScoreResult` is the transient outcome of best-score selection.
//! `ScoreRecord` is the JSON document persisted for the autograder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Format used for the deadline field of the score record
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Which leaderboard score a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreType {
    Private,
    Public,
}

impl std::fmt::Display for ScoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreType::Private => write!(f, "private"),
            ScoreType::Public => write!(f, "public"),
        }
    }
}

/// Winning effective score and its origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreResult {
    pub score: f64,
    pub score_type: ScoreType,
}

/// Persisted score snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub kaggle_username: String,
    pub acknowledgement: bool,
    pub submitted_slack: bool,
    pub competition_name: String,
    pub deadline: String,
    /// Score on a 0-100 scale
    pub raw_score: f64,
    pub score_type: ScoreType,
}

impl ScoreRecord {
    pub fn new(
        kaggle_username: &str,
        acknowledgement: bool,
        submitted_slack: bool,
        competition_name: &str,
        deadline: DateTime<Utc>,
        result: ScoreResult,
    ) -> Self {
        Self {
            kaggle_username: kaggle_username.to_string(),
            acknowledgement,
            submitted_slack,
            competition_name: competition_name.to_string(),
            deadline: deadline.format(DEADLINE_FORMAT).to_string(),
            raw_score: result.score * 100.0,
            score_type: result.score_type,
        }
    }
}
