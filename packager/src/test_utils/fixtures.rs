//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use std::path::Path;

use serde_json::{json, Map, Value};

use crate::config::{eastern_to_utc, AssignmentSettings, Secret, SubmissionConfig};
use crate::domain::entities::{Direction, RunRecord, SubmissionRecord};

/// Create a finished run reporting a single summary metric
pub fn test_run_with_metric(name: &str, metric: &str, value: f64) -> RunRecord {
    let mut summary = Map::new();
    summary.insert(metric.to_string(), json!(value));
    summary.insert("_step".to_string(), json!(50));

    let mut config = Map::new();
    config.insert("lr".to_string(), json!(0.001));
    config.insert("batch_size".to_string(), json!(256));

    RunRecord {
        id: format!("id-{}", name),
        name: name.to_string(),
        tags: vec!["hw2p2".to_string()],
        state: "finished".to_string(),
        created_at: "2026-01-05T12:00:00".to_string(),
        config,
        summary,
        history: None,
    }
}

/// Create runs named `run-0`, `run-1`, ... with the given metric values
pub fn test_runs_with_metrics(metric: &str, values: &[f64]) -> Vec<RunRecord> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| test_run_with_metric(&format!("run-{}", i), metric, *value))
        .collect()
}

/// Create a submission by `submitted_by`
pub fn test_submission(
    private_score: Option<f64>,
    public_score: Option<f64>,
    submitted_by: &str,
) -> SubmissionRecord {
    SubmissionRecord {
        private_score,
        public_score,
        submitted_by: submitted_by.to_string(),
        submitted_by_ref: None,
        date: Some("2026-01-10T18:00:00".to_string()),
        description: Some("resnet".to_string()),
    }
}

/// History rows as the run tracker returns them
pub fn test_history_rows(steps: usize) -> Vec<Map<String, Value>> {
    (0..steps)
        .map(|step| {
            let mut row = Map::new();
            row.insert("_step".to_string(), json!(step));
            row.insert("train_loss".to_string(), json!(1.0 / (step as f64 + 1.0)));
            row
        })
        .collect()
}

/// Course settings writing every artifact into `dir`
pub fn test_settings(dir: &Path) -> AssignmentSettings {
    AssignmentSettings {
        wandb_metric: "EER".to_string(),
        wandb_direction: Direction::descending(),
        wandb_top_n: 10,
        wandb_output: "wandb_top_runs.pkl".to_string(),
        competition_name: "hw2p2".to_string(),
        slack_competition_name: "hw2p2-slack".to_string(),
        final_deadline: eastern_to_utc("2026-01-11 23:59:59").unwrap(),
        slack_deadline: eastern_to_utc("2026-01-14 23:59:59").unwrap(),
        grading_direction: Direction::descending(),
        kaggle_output: "kaggle_data.json".to_string(),
        submission_output: "submission.zip".to_string(),
        output_dir: dir.to_path_buf(),
    }
}

/// A valid submission config whose model metadata and notebook exist in `dir`
pub fn test_config(dir: &Path) -> SubmissionConfig {
    let model_metadata_path = dir.join("model_metadata.json");
    let notebook_path = dir.join("notebook.ipynb");
    std::fs::write(
        &model_metadata_path,
        r#"{"parameter_count": 42, "model_architecture": "Linear"}"#,
    )
    .unwrap();
    std::fs::write(&notebook_path, r#"{"cells": []}"#).unwrap();

    SubmissionConfig {
        acknowledged: true,
        enable_slack_submission: Some(false),
        readme: "ResNet34 with ArcFace loss, 60 epochs, cosine schedule.".to_string(),
        kaggle_username: "student".to_string(),
        kaggle_api_key: Secret::new("kaggle-key"),
        wandb_api_key: Secret::new("wandb-key"),
        wandb_entity: "student".to_string(),
        wandb_project: "hw2p2".to_string(),
        model_metadata_path,
        notebook_path,
        strict: true,
        additional_files: Vec::new(),
    }
}
