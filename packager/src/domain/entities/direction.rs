//! Ranking direction
//!
//! The course configuration labels directions as:
//! - `"ascending"`: higher is better
//! - anything else (canonically `"descending"`): lower is better
//!
//! The label is kept verbatim because the run-tracker ordering hint is
//! derived from the exact string.

use serde::{Deserialize, Serialize};

pub const ASCENDING: &str = "ascending";
pub const DESCENDING: &str = "descending";

/// A configured ranking direction, stored as its literal label
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Direction(String);

impl Direction {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn ascending() -> Self {
        Self::new(ASCENDING)
    }

    pub fn descending() -> Self {
        Self::new(DESCENDING)
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    /// Only the exact label `"ascending"` ranks larger values first
    pub fn higher_is_better(&self) -> bool {
        self.0 == ASCENDING
    }

    /// Score assumed for a submission that has neither a private nor a public score
    pub fn default_score(&self) -> f64 {
        if self.higher_is_better() {
            0.0
        } else {
            1.0
        }
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self::descending()
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
