//! Domain entities
//!
//! Pure domain models shared by the ports, adapters and the packager.

pub mod direction;
pub mod metadata;
pub mod run;
pub mod score;
pub mod submission;

pub use direction::Direction;
pub use metadata::ModelMetadata;
pub use run::{ExportedRun, RunHistory, RunOrdering, RunRecord, HISTORY_SAMPLES};
pub use score::{ScoreRecord, ScoreResult, ScoreType};
pub use submission::SubmissionRecord;
