//! Unified error types for the submission packager
//!
//! This module defines error types for each layer:
//! - `ConfigError`: Environment / settings loading errors
//! - `RunTrackerError`: Run-tracking (W&B) API client errors
//! - `LeaderboardError`: Leaderboard (Kaggle) API client errors
//! - `PackagingError`: Application layer errors surfaced by the packager

use std::path::PathBuf;

use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Invalid deadline '{value}': {message}")]
    InvalidDeadline { value: String, message: String },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Run-tracking API client errors
#[derive(Debug, Error)]
pub enum RunTrackerError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized - invalid API key")]
    Unauthorized,

    #[error("Project not found: {entity}/{project}")]
    ProjectNotFound { entity: String, project: String },

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Leaderboard API client errors
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized - invalid credentials")]
    Unauthorized,

    #[error("Competition not found: {0}")]
    CompetitionNotFound(String),

    #[error("Credentials file error at {path}: {message}")]
    Credentials { path: PathBuf, message: String },

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Application layer errors - one per halting point of the packaging pipeline
#[derive(Debug, Error)]
pub enum PackagingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to write {file}")]
    Io {
        file: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Service error: {0}")]
    Service(String),

    #[error(
        "Missing files with strict mode enabled: {}. Upload any necessary files, check the paths and rerun.",
        missing.join(", ")
    )]
    Incomplete { missing: Vec<String> },
}

impl PackagingError {
    /// Whether this error aborts the run after files were already produced
    pub fn is_fatal(&self) -> bool {
        matches!(self, PackagingError::Incomplete { .. })
    }
}

impl From<RunTrackerError> for PackagingError {
    fn from(e: RunTrackerError) -> Self {
        match e {
            RunTrackerError::Unauthorized => PackagingError::Authentication(e.to_string()),
            RunTrackerError::ProjectNotFound { .. } | RunTrackerError::RunNotFound(_) => {
                PackagingError::NotFound(e.to_string())
            }
            e => PackagingError::Service(format!("Run tracker error: {}", e)),
        }
    }
}

impl From<LeaderboardError> for PackagingError {
    fn from(e: LeaderboardError) -> Self {
        match e {
            LeaderboardError::Unauthorized | LeaderboardError::Credentials { .. } => {
                PackagingError::Authentication(e.to_string())
            }
            LeaderboardError::CompetitionNotFound(_) => PackagingError::NotFound(e.to_string()),
            e => PackagingError::Service(format!("Leaderboard error: {}", e)),
        }
    }
}
