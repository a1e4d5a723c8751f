//! Artifact writers
//!
//! Each writer produces one local file and reports success as a flag. The
//! specific failure is logged here; callers only decide whether to stop.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde_pickle::SerOptions;

use crate::domain::entities::{ExportedRun, ModelMetadata, ScoreRecord};

/// Text stored in the acknowledgement artifact
pub const ACKNOWLEDGEMENT_MESSAGE: &str = r#"
Submission of this file and assignment indicates the student's agreement to the following acknowledgement requirements.
Setting the ACKNOWLEDGED flag to True indicates full understanding and acceptance of the following:
1. Slack days may ONLY be used on the P2 FINAL (not checkpoint) submission, i.e. you may submit final P2 Kaggle scores later on the SLACK KAGGLE COMPETITION at the expense of your slack days.
2. The final Autolab code submission is due 48 hours after the conclusion of the Kaggle deadline (or the same day as your final Kaggle submission).
3. Course staff will use the Kaggle username given here to pull your official PRIVATE leaderboard score. Slight variance between scores and code is checked for acceptable discrepancies; any discrepancy caused by modifying the submission code will result in an AIV.
4. You are NOT allowed to use code that pre-loads models (such as those from Hugging Face). You MAY use models described by papers or articles, but you MUST implement them yourself from fundamental PyTorch operations (Linear, Conv2d, etc.).
5. You are NOT allowed to use any external data or datasets at ANY point of this assignment.
6. You may work with teammates to run ablations and experiments, BUT you must submit your OWN code and your OWN results.
7. Failure to comply with the prior rules will be considered an Academic Integrity Violation (AIV).
8. Late submissions MUST be made through the slack Kaggle competition. Submissions made to the regular Kaggle competition after the original deadline will NOT be considered, no matter how many slack days remain.
"#;

/// Run `write` against a buffered handle to a freshly created `path`
///
/// The handle is flushed and closed before returning, whether or not `write` fails.
fn scoped_write<F, E>(path: &Path, write: F) -> bool
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), E>,
    E: std::fmt::Display,
{
    let result = File::create(path)
        .map_err(|e| e.to_string())
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            write(&mut writer).map_err(|e| e.to_string())?;
            writer.flush().map_err(|e| e.to_string())
        });

    match result {
        Ok(()) => {
            tracing::info!("OK: Saved {}", path.display());
            true
        }
        Err(e) => {
            tracing::error!("Error occurred while saving {}: {}", path.display(), e);
            false
        }
    }
}

/// Write trimmed text to `path`
pub fn write_text(path: &Path, content: &str) -> bool {
    scoped_write(path, |w| w.write_all(content.trim().as_bytes()))
}

pub fn save_acknowledgement(path: &Path) -> bool {
    write_text(path, ACKNOWLEDGEMENT_MESSAGE)
}

pub fn save_readme(path: &Path, readme: &str) -> bool {
    write_text(path, readme)
}

/// Serialize the exported runs as a pickled list of dicts
pub fn save_runs_export(path: &Path, runs: &[ExportedRun]) -> bool {
    scoped_write(path, |w| serde_pickle::to_writer(w, &runs, SerOptions::new()))
}

/// Write the score record as indented JSON
pub fn save_score_record(path: &Path, record: &ScoreRecord) -> bool {
    scoped_write(path, |w| serde_json::to_writer_pretty(w, record))
}

/// Write `model_metadata_<timestamp>.json` into `dir`, returning its path
pub fn save_model_metadata(
    dir: &Path,
    metadata: &ModelMetadata,
    at: DateTime<Local>,
) -> Option<PathBuf> {
    let path = dir.join(ModelMetadata::file_name(at));
    scoped_write(&path, |w| serde_json::to_writer_pretty(w, metadata)).then_some(path)
}
