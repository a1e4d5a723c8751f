//! Packager service
//!
//! Validates a submission config, produces every artifact in order, then
//! zips them and hands the archive to the host for delivery.
//!
//! Pipeline (each step must succeed before the next runs):
//! 1. acknowledgement text
//! 2. README text
//! 3. top-N run export from the run tracker
//! 4. best leaderboard score record
//! 5. archive assembly and delivery

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::app::archive::{assemble_archive, ArchiveReport};
use crate::app::artifacts;
use crate::config::{AssignmentSettings, SubmissionConfig, ACKNOWLEDGEMENT_FILE, README_FILE};
use crate::domain::entities::{
    ExportedRun, ModelMetadata, RunHistory, RunOrdering, ScoreRecord, HISTORY_SAMPLES,
};
use crate::domain::ports::{DeliveryReceipt, FileDelivery, Leaderboard, RunTracker};
use crate::domain::selection::{best_runs, best_submission, RunSelection};
use crate::error::PackagingError;

/// Everything a successful packaging run produced
#[derive(Debug, Clone)]
pub struct PackageReport {
    pub archive: ArchiveReport,
    pub score: ScoreRecord,
    pub runs_exported: usize,
    pub delivery: DeliveryReceipt,
}

/// Service that drives a full submission
pub struct PackagerService<RT, LB, FD>
where
    RT: RunTracker,
    LB: Leaderboard,
    FD: FileDelivery,
{
    tracker: Arc<RT>,
    leaderboard: Arc<LB>,
    delivery: Arc<FD>,
    settings: AssignmentSettings,
}

impl<RT, LB, FD> PackagerService<RT, LB, FD>
where
    RT: RunTracker,
    LB: Leaderboard,
    FD: FileDelivery,
{
    pub fn new(
        tracker: Arc<RT>,
        leaderboard: Arc<LB>,
        delivery: Arc<FD>,
        settings: AssignmentSettings,
    ) -> Self {
        Self {
            tracker,
            leaderboard,
            delivery,
            settings,
        }
    }

    pub fn settings(&self) -> &AssignmentSettings {
        &self.settings
    }

    /// Check the config before anything is written; the first failing check wins
    pub fn validate(config: &SubmissionConfig) -> Result<(), PackagingError> {
        if !config.acknowledged {
            return Err(PackagingError::Validation(
                "ACKNOWLEDGED must be set to true. Read the acknowledgement section and rerun."
                    .to_string(),
            ));
        }

        if config.enable_slack_submission.is_none() {
            return Err(PackagingError::Validation(
                "ENABLE_SLACK_SUBMISSION is not set. Set it to true only if you are submitting \
                 through the slack competition, false otherwise."
                    .to_string(),
            ));
        }

        if config.readme.trim().is_empty() {
            return Err(PackagingError::Validation(
                "README is empty. Describe your submission before packaging.".to_string(),
            ));
        }

        if config.kaggle_username.trim().is_empty() || config.kaggle_api_key.is_empty() {
            return Err(PackagingError::Validation(
                "KAGGLE_USERNAME and KAGGLE_API_KEY must both be set.".to_string(),
            ));
        }

        Ok(())
    }

    /// Run the whole pipeline and build the archive
    pub async fn package(&self, config: SubmissionConfig) -> Result<PackageReport, PackagingError> {
        Self::validate(&config).inspect_err(|e| tracing::error!("{}", e))?;

        let output_dir = &self.settings.output_dir;
        std::fs::create_dir_all(output_dir).map_err(|source| {
            tracing::error!("Cannot create output directory {}: {}", output_dir.display(), source);
            PackagingError::Io {
                file: output_dir.display().to_string(),
                source: Some(source),
            }
        })?;

        let acknowledgement = self.settings.output_path(ACKNOWLEDGEMENT_FILE);
        if !artifacts::save_acknowledgement(&acknowledgement) {
            return Err(write_failed(ACKNOWLEDGEMENT_FILE));
        }

        let readme = self.settings.output_path(README_FILE);
        if !artifacts::save_readme(&readme, &config.readme) {
            return Err(write_failed(README_FILE));
        }

        let runs_exported = self
            .export_top_runs(&config)
            .await
            .inspect_err(|e| tracing::error!("{}", e))?;

        let score = self.save_score_record(&config).await.inspect_err(|e| {
            tracing::error!(
                "{}. Could not retrieve Kaggle information for [{}] in competition [{}] \
                 with slack flag set to [{}]. Check your Kaggle username, key and submissions.",
                e,
                config.kaggle_username,
                self.settings.active_competition(config.slack()).0,
                config.slack()
            )
        })?;

        let mut files: Vec<PathBuf> = vec![
            acknowledgement,
            readme,
            self.settings.output_path(&self.settings.kaggle_output),
            self.settings.output_path(&self.settings.wandb_output),
            config.model_metadata_path.clone(),
            config.notebook_path.clone(),
        ];
        files.extend(config.additional_files.iter().cloned());

        let archive_path = self.settings.output_path(&self.settings.submission_output);
        let archive = assemble_archive(&archive_path, &files, config.strict)
            .inspect_err(|e| tracing::error!("{}", e))?;

        let delivery = self.delivery.deliver(&archive.path);
        tracing::info!("Final submission saved as: {}", archive.path.display());

        Ok(PackageReport {
            archive,
            score,
            runs_exported,
            delivery,
        })
    }

    /// Export the top-N runs of the configured project; returns how many were written
    pub async fn export_top_runs(&self, config: &SubmissionConfig) -> Result<usize, PackagingError> {
        let account = self.tracker.authenticate().await?;
        tracing::info!(
            username = account.username.as_deref().unwrap_or("unknown"),
            "Logged in to run tracker"
        );

        let metric = &self.settings.wandb_metric;
        let direction = &self.settings.wandb_direction;
        let ordering = RunOrdering::new(metric.as_str(), direction.clone());
        let runs = self
            .tracker
            .list_runs(&config.wandb_entity, &config.wandb_project, &ordering)
            .await?;

        let selected = match best_runs(&runs, metric, direction, self.settings.wandb_top_n) {
            RunSelection::Top(selected) if !selected.is_empty() => selected,
            _ => {
                return Err(PackagingError::NotFound(format!(
                    "No runs found for {}/{}. Check that your W&B username or team name, \
                     API key and project name are correct.",
                    config.wandb_entity, config.wandb_project
                )))
            }
        };

        let mut exported = Vec::with_capacity(selected.len());
        for run in selected {
            let history = match self
                .tracker
                .run_history(
                    &config.wandb_entity,
                    &config.wandb_project,
                    &run.id,
                    HISTORY_SAMPLES,
                )
                .await
            {
                Ok(rows) => RunHistory::Rows(rows),
                Err(e) => {
                    tracing::warn!(run = %run.id, "History unavailable: {}", e);
                    RunHistory::unavailable(e)
                }
            };
            exported.push(ExportedRun::new(run, history));
        }

        let path = self.settings.output_path(&self.settings.wandb_output);
        if !artifacts::save_runs_export(&path, &exported) {
            return Err(write_failed(&self.settings.wandb_output));
        }

        tracing::info!(
            "OK: Exported {} W&B runs to {}",
            exported.len(),
            self.settings.wandb_output
        );
        Ok(exported.len())
    }

    /// Fetch the student's submissions, pick the best score and persist it
    pub async fn save_score_record(
        &self,
        config: &SubmissionConfig,
    ) -> Result<ScoreRecord, PackagingError> {
        let username = config.kaggle_username.trim();

        self.leaderboard
            .store_credentials(username, config.kaggle_api_key.expose())
            .await?;

        match self.leaderboard.user_exists(username).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(PackagingError::NotFound(format!(
                    "User '{}' not found.",
                    username
                )))
            }
            Err(e) => {
                tracing::error!("Error occurred while checking Kaggle user: {}", e);
                return Err(PackagingError::NotFound(format!(
                    "User '{}' could not be verified.",
                    username
                )));
            }
        }

        let slack = config.slack();
        let (competition, deadline) = self.settings.active_competition(slack);

        self.leaderboard.authenticate().await?;
        let submissions: Vec<_> = self
            .leaderboard
            .list_submissions(competition)
            .await?
            .into_iter()
            .filter(|s| s.is_by(username))
            .collect();

        let not_found = || {
            PackagingError::NotFound(format!(
                "No valid submissions found for user [{}] for competition [{}]. Slack flag set to [{}]. \
                 Double check your Kaggle username and make sure you have submitted at least once.",
                username, competition, slack
            ))
        };

        let result =
            best_submission(&submissions, &self.settings.grading_direction).ok_or_else(not_found)?;
        if result.score == 0.0 {
            return Err(PackagingError::NotFound(format!(
                "Best {} score for user [{}] is zero; no scored submission to record.",
                result.score_type, username
            )));
        }

        let record = ScoreRecord::new(
            username,
            config.acknowledged,
            slack,
            competition,
            deadline,
            result,
        );

        let path = self.settings.output_path(&self.settings.kaggle_output);
        if !artifacts::save_score_record(&path, &record) {
            return Err(write_failed(&self.settings.kaggle_output));
        }

        tracing::info!(
            "OK: Projected score (excluding bonuses) saved as {}. Best score {}.",
            self.settings.kaggle_output,
            result.score
        );
        Ok(record)
    }

    /// Write a model metadata file and hand it to the host
    pub fn generate_model_metadata(
        &self,
        metadata: &ModelMetadata,
        at: DateTime<Local>,
    ) -> Result<DeliveryReceipt, PackagingError> {
        std::fs::create_dir_all(&self.settings.output_dir).map_err(|source| PackagingError::Io {
            file: self.settings.output_dir.display().to_string(),
            source: Some(source),
        })?;

        let path = artifacts::save_model_metadata(&self.settings.output_dir, metadata, at)
            .ok_or_else(|| write_failed(&ModelMetadata::file_name(at)))?;

        Ok(self.delivery.deliver(&path))
    }
}

fn write_failed(file: &str) -> PackagingError {
    PackagingError::Io {
        file: file.to_string(),
        source: None,
    }
}
