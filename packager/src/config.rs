//! Submission configuration
//!
//! Everything a packaging run needs is loaded once into immutable values and
//! passed explicitly to the packager:
//! - `SubmissionConfig`: the student's flags, credentials and paths
//! - `AssignmentSettings`: course-wide constants (metric, directions, deadlines, file names)
//! - `ServiceEndpoints`: where the run tracker and leaderboard live

use std::env;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::America::New_York;

use crate::domain::entities::Direction;
use crate::error::ConfigError;

/// Format of the configured deadline strings
pub const DEADLINE_INPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const ACKNOWLEDGEMENT_FILE: &str = "acknowledgement.txt";
pub const README_FILE: &str = "README.txt";

const DEFAULT_METRIC: &str = "EER";
const DEFAULT_TOP_N: usize = 10;
const DEFAULT_RUNS_OUTPUT: &str = "wandb_top_runs.pkl";
const DEFAULT_COMPETITION: &str = "s-26-hw-2-p-2-sandbox";
const DEFAULT_DEADLINE: &str = "2026-01-11 23:59:59";
const DEFAULT_SCORE_OUTPUT: &str = "kaggle_data.json";
const DEFAULT_SUBMISSION_OUTPUT: &str = "HW2P2_final_submission.zip";

/// An opaque credential; never printed
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            write!(f, "Secret(<empty>)")
        } else {
            write!(f, "Secret(<redacted>)")
        }
    }
}

/// The student's submission values
#[derive(Debug, Clone, Default)]
pub struct SubmissionConfig {
    pub acknowledged: bool,
    /// `None` when the slack flag was never set
    pub enable_slack_submission: Option<bool>,
    pub readme: String,
    pub kaggle_username: String,
    pub kaggle_api_key: Secret,
    pub wandb_api_key: Secret,
    /// W&B username or team name owning the project
    pub wandb_entity: String,
    pub wandb_project: String,
    pub model_metadata_path: PathBuf,
    pub notebook_path: PathBuf,
    /// Abort when any expected file is missing from the archive
    pub strict: bool,
    pub additional_files: Vec<PathBuf>,
}

impl SubmissionConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, test map, ...)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let readme = match lookup("README") {
            Some(readme) => readme,
            None => match lookup("README_PATH") {
                Some(path) => read_file(Path::new(&path))?,
                None => String::new(),
            },
        };

        let additional_files = lookup("ADDITIONAL_FILES")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(PathBuf::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            acknowledged: parse_bool("ACKNOWLEDGED", lookup("ACKNOWLEDGED"))?.unwrap_or(false),
            enable_slack_submission: parse_bool(
                "ENABLE_SLACK_SUBMISSION",
                lookup("ENABLE_SLACK_SUBMISSION"),
            )?,
            readme,
            kaggle_username: lookup("KAGGLE_USERNAME").unwrap_or_default(),
            kaggle_api_key: Secret::new(lookup("KAGGLE_API_KEY").unwrap_or_default()),
            wandb_api_key: Secret::new(lookup("WANDB_API_KEY").unwrap_or_default()),
            wandb_entity: lookup("WANDB_USERNAME_OR_TEAMNAME").unwrap_or_default(),
            wandb_project: lookup("WANDB_PROJECT").unwrap_or_default(),
            model_metadata_path: PathBuf::from(lookup("MODEL_METADATA_JSON").unwrap_or_default()),
            notebook_path: PathBuf::from(lookup("NOTEBOOK_PATH").unwrap_or_default()),
            strict: parse_bool("STRICT_SUBMISSION", lookup("STRICT_SUBMISSION"))?.unwrap_or(true),
            additional_files,
        })
    }

    /// Slack flag, treating an unset flag as a regular submission
    pub fn slack(&self) -> bool {
        self.enable_slack_submission.unwrap_or(false)
    }
}

/// Course-wide constants
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentSettings {
    /// Summary metric used to rank runs
    pub wandb_metric: String,
    pub wandb_direction: Direction,
    pub wandb_top_n: usize,
    pub wandb_output: String,
    pub competition_name: String,
    pub slack_competition_name: String,
    pub final_deadline: DateTime<Utc>,
    pub slack_deadline: DateTime<Utc>,
    pub grading_direction: Direction,
    pub kaggle_output: String,
    pub submission_output: String,
    /// Directory every artifact and the archive are written to
    pub output_dir: PathBuf,
}

impl AssignmentSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let wandb_top_n = match lookup("WANDB_TOP_N") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: "WANDB_TOP_N".to_string(),
                    message: e.to_string(),
                })?,
            None => DEFAULT_TOP_N,
        };
        if wandb_top_n == 0 {
            return Err(ConfigError::InvalidValue {
                key: "WANDB_TOP_N".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        let competition_name =
            lookup("COMPETITION_NAME").unwrap_or_else(|| DEFAULT_COMPETITION.to_string());

        Ok(Self {
            wandb_metric: lookup("WANDB_METRIC").unwrap_or_else(|| DEFAULT_METRIC.to_string()),
            wandb_direction: lookup("WANDB_DIRECTION")
                .map(Direction::new)
                .unwrap_or_default(),
            wandb_top_n,
            wandb_output: lookup("WANDB_OUTPUT_PKL")
                .unwrap_or_else(|| DEFAULT_RUNS_OUTPUT.to_string()),
            slack_competition_name: lookup("SLACK_COMPETITION_NAME")
                .unwrap_or_else(|| competition_name.clone()),
            competition_name,
            final_deadline: eastern_to_utc(
                &lookup("FINAL_SUBMISSION_DATETIME")
                    .unwrap_or_else(|| DEFAULT_DEADLINE.to_string()),
            )?,
            slack_deadline: eastern_to_utc(
                &lookup("SLACK_SUBMISSION_DATETIME")
                    .unwrap_or_else(|| DEFAULT_DEADLINE.to_string()),
            )?,
            grading_direction: lookup("GRADING_DIRECTION")
                .map(Direction::new)
                .unwrap_or_default(),
            kaggle_output: lookup("KAGGLE_OUTPUT_JSON")
                .unwrap_or_else(|| DEFAULT_SCORE_OUTPUT.to_string()),
            submission_output: lookup("SUBMISSION_OUTPUT")
                .unwrap_or_else(|| DEFAULT_SUBMISSION_OUTPUT.to_string()),
            output_dir: PathBuf::from(
                lookup("SUBMISSION_OUTPUT_DIR").unwrap_or_else(|| ".".to_string()),
            ),
        })
    }

    /// Competition and deadline the submission is graded against
    pub fn active_competition(&self, slack: bool) -> (&str, DateTime<Utc>) {
        if slack {
            (&self.slack_competition_name, self.slack_deadline)
        } else {
            (&self.competition_name, self.final_deadline)
        }
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }
}

/// Service base URLs and the leaderboard credentials directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    pub wandb_base_url: String,
    pub kaggle_api_url: String,
    pub kaggle_web_url: String,
    pub kaggle_config_dir: PathBuf,
}

impl ServiceEndpoints {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let kaggle_config_dir = lookup("KAGGLE_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                lookup("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_default()
                    .join(".kaggle")
            });

        Self {
            wandb_base_url: lookup("WANDB_BASE_URL")
                .unwrap_or_else(|| "https://api.wandb.ai".to_string()),
            kaggle_api_url: lookup("KAGGLE_BASE_URL")
                .unwrap_or_else(|| "https://www.kaggle.com/api/v1".to_string()),
            kaggle_web_url: lookup("KAGGLE_WEB_URL")
                .unwrap_or_else(|| "https://www.kaggle.com".to_string()),
            kaggle_config_dir,
        }
    }
}

/// Convert an Eastern wall-clock deadline to UTC
///
/// Ambiguous times during the autumn fall-back resolve to the earlier instant.
pub fn eastern_to_utc(value: &str) -> Result<DateTime<Utc>, ConfigError> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), DEADLINE_INPUT_FORMAT).map_err(|e| {
        ConfigError::InvalidDeadline {
            value: value.to_string(),
            message: e.to_string(),
        }
    })?;

    New_York
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| ConfigError::InvalidDeadline {
            value: value.to_string(),
            message: "time does not exist in America/New_York".to_string(),
        })
}

fn parse_bool(key: &str, value: Option<String>) -> Result<Option<bool>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got '{}'", other),
        }),
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn eastern_deadline_converts_to_utc() {
        let utc = eastern_to_utc("2026-01-11 23:59:59").unwrap();
        assert_eq!(utc.to_string(), "2026-01-12 04:59:59 UTC");

        // Daylight saving time is UTC-4
        let summer = eastern_to_utc("2026-07-01 12:00:00").unwrap();
        assert_eq!(summer.to_string(), "2026-07-01 16:00:00 UTC");
    }

    #[test]
    fn malformed_deadline_is_rejected() {
        let err = eastern_to_utc("11/01/2026").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDeadline { .. }));
    }

    #[test]
    fn settings_use_course_defaults() {
        let settings = AssignmentSettings::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(settings.wandb_metric, "EER");
        assert_eq!(settings.wandb_direction, Direction::descending());
        assert_eq!(settings.grading_direction, Direction::descending());
        assert_eq!(settings.wandb_top_n, 10);
        assert_eq!(settings.wandb_output, "wandb_top_runs.pkl");
        assert_eq!(settings.kaggle_output, "kaggle_data.json");
        assert_eq!(settings.submission_output, "HW2P2_final_submission.zip");
        assert_eq!(settings.slack_competition_name, settings.competition_name);
    }

    #[test]
    fn zero_top_n_is_rejected() {
        let err = AssignmentSettings::from_lookup(lookup_from(&[("WANDB_TOP_N", "0")]))
            .unwrap_err();
        assert!(err.to_string().contains("WANDB_TOP_N"));
    }

    #[test]
    fn active_competition_follows_slack_flag() {
        let settings = AssignmentSettings::from_lookup(lookup_from(&[
            ("COMPETITION_NAME", "regular"),
            ("SLACK_COMPETITION_NAME", "slack"),
            ("FINAL_SUBMISSION_DATETIME", "2026-01-11 23:59:59"),
            ("SLACK_SUBMISSION_DATETIME", "2026-01-14 23:59:59"),
        ]))
        .unwrap();

        let (name, deadline) = settings.active_competition(false);
        assert_eq!(name, "regular");
        assert_eq!(deadline, settings.final_deadline);

        let (name, deadline) = settings.active_competition(true);
        assert_eq!(name, "slack");
        assert_eq!(deadline, settings.slack_deadline);
    }

    #[test]
    fn unset_slack_flag_stays_unset() {
        let config = SubmissionConfig::from_lookup(lookup_from(&[("ACKNOWLEDGED", "true")]))
            .unwrap();
        assert!(config.acknowledged);
        assert_eq!(config.enable_slack_submission, None);

        let config =
            SubmissionConfig::from_lookup(lookup_from(&[("ENABLE_SLACK_SUBMISSION", "False")]))
                .unwrap();
        assert_eq!(config.enable_slack_submission, Some(false));
    }

    #[test]
    fn invalid_boolean_is_rejected() {
        let err = SubmissionConfig::from_lookup(lookup_from(&[("ACKNOWLEDGED", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn readme_can_be_read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readme.md");
        std::fs::write(&path, "Trained a ResNet.").unwrap();

        let config = SubmissionConfig::from_lookup(lookup_from(&[(
            "README_PATH",
            path.to_str().unwrap(),
        )]))
        .unwrap();

        assert_eq!(config.readme, "Trained a ResNet.");
    }

    #[test]
    fn additional_files_are_comma_separated() {
        let config = SubmissionConfig::from_lookup(lookup_from(&[(
            "ADDITIONAL_FILES",
            "a.py, b/c.py,,",
        )]))
        .unwrap();

        assert_eq!(
            config.additional_files,
            vec![PathBuf::from("a.py"), PathBuf::from("b/c.py")]
        );
    }

    #[test]
    fn secrets_are_redacted_in_debug_output() {
        let config = SubmissionConfig {
            kaggle_api_key: Secret::new("super-secret"),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn kaggle_config_dir_defaults_under_home() {
        let endpoints = ServiceEndpoints::from_lookup(lookup_from(&[("HOME", "/home/student")]));
        assert_eq!(
            endpoints.kaggle_config_dir,
            PathBuf::from("/home/student/.kaggle")
        );

        let endpoints = ServiceEndpoints::from_lookup(lookup_from(&[
            ("HOME", "/home/student"),
            ("KAGGLE_CONFIG_DIR", "/tmp/kaggle"),
        ]));
        assert_eq!(endpoints.kaggle_config_dir, PathBuf::from("/tmp/kaggle"));
    }
}
