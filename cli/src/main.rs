//! Course submission packager CLI
//!
//! The `submit` command builds the final assignment archive.
//!
//! ## Commands
//!
//! - `package`: Validate the configuration, export runs and scores, build the archive
//! - `metadata`: Write a timestamped model metadata file
//!
//! Values come from the environment (and a `.env` file); flags override a few of them.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use submission_packager::adapters::{HostEnvironment, KaggleClientImpl, WandbClientImpl};
use submission_packager::domain::entities::ModelMetadata;
use submission_packager::domain::ports::DeliveryReceipt;
use submission_packager::{AssignmentSettings, PackagerService, ServiceEndpoints, SubmissionConfig};

const DEFAULT_LOG_FILTER: &str = "info,submission_packager=debug";

#[derive(Parser)]
#[command(name = "submit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Package a course assignment submission", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the submission archive
    Package {
        /// Abort when any expected file is missing (overrides STRICT_SUBMISSION)
        #[arg(long, conflicts_with = "no_strict")]
        strict: bool,

        /// Archive whatever exists and warn about missing files
        #[arg(long)]
        no_strict: bool,

        /// Extra file to include; may be repeated
        #[arg(long = "extra", value_name = "FILE")]
        extra: Vec<PathBuf>,

        /// Directory for artifacts and the archive (overrides SUBMISSION_OUTPUT_DIR)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Write model_metadata_<timestamp>.json
    Metadata {
        /// Number of model parameters
        #[arg(long)]
        parameter_count: u64,

        /// Printed model architecture
        #[arg(long, conflicts_with = "architecture_file")]
        architecture: Option<String>,

        /// File holding the printed model architecture
        #[arg(long)]
        architecture_file: Option<PathBuf>,

        /// Directory to write into (overrides SUBMISSION_OUTPUT_DIR)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

fn init_tracing(json: bool, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn build_service(
    config: &SubmissionConfig,
    settings: AssignmentSettings,
) -> PackagerService<WandbClientImpl, KaggleClientImpl, HostEnvironment> {
    let endpoints = ServiceEndpoints::from_env();
    let host = HostEnvironment::detect();
    tracing::debug!(host = host.name(), ?endpoints, "Resolved environment");

    PackagerService::new(
        Arc::new(WandbClientImpl::new(
            endpoints.wandb_base_url,
            config.wandb_api_key.clone(),
        )),
        Arc::new(KaggleClientImpl::new(
            endpoints.kaggle_api_url,
            endpoints.kaggle_web_url,
            endpoints.kaggle_config_dir,
        )),
        Arc::new(host),
        settings,
    )
}

fn print_receipt(receipt: &DeliveryReceipt) {
    for line in &receipt.instructions {
        println!("{}", line);
    }
}

async fn cmd_package(
    strict: bool,
    no_strict: bool,
    extra: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let mut config = SubmissionConfig::from_env().context("Failed to load submission config")?;
    let mut settings = AssignmentSettings::from_env().context("Failed to load course settings")?;

    if strict {
        config.strict = true;
    } else if no_strict {
        config.strict = false;
    }
    config.additional_files.extend(extra);
    if let Some(dir) = output_dir {
        settings = settings.with_output_dir(dir);
    }

    let service = build_service(&config, settings);
    let report = service
        .package(config)
        .await
        .context("Submission packaging failed")?;

    println!("Final submission saved as: {}", report.archive.path.display());
    println!(
        "Projected score (excluding bonuses): {:.4} ({})",
        report.score.raw_score, report.score.score_type
    );
    if !report.archive.is_complete() {
        println!("Missing files: {}", report.archive.missing.join(", "));
    }
    print_receipt(&report.delivery);
    Ok(())
}

fn cmd_metadata(
    parameter_count: u64,
    architecture: Option<String>,
    architecture_file: Option<PathBuf>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let model_architecture = match (architecture, architecture_file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => bail!("Pass --architecture or --architecture-file"),
    };

    let config = SubmissionConfig::from_env().context("Failed to load submission config")?;
    let mut settings = AssignmentSettings::from_env().context("Failed to load course settings")?;
    if let Some(dir) = output_dir {
        settings = settings.with_output_dir(dir);
    }

    let service = build_service(&config, settings);
    let receipt = service
        .generate_model_metadata(
            &ModelMetadata {
                parameter_count,
                model_architecture,
            },
            Local::now(),
        )
        .context("Failed to write model metadata")?;

    println!("Model metadata saved as: {}", receipt.path.display());
    print_receipt(&receipt);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json, cli.verbose);

    match cli.command {
        Commands::Package {
            strict,
            no_strict,
            extra,
            output_dir,
        } => cmd_package(strict, no_strict, extra, output_dir).await,
        Commands::Metadata {
            parameter_count,
            architecture,
            architecture_file,
            output_dir,
        } => cmd_metadata(parameter_count, architecture, architecture_file, output_dir),
    }
}
