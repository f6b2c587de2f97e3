use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use tracing::info;

use student_score_predictor::cli::{self, Cli};
use student_score_predictor::monitoring;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file
    dotenv().ok();

    let args = Cli::parse();

    // Load configuration
    let settings = cli::load_settings(&args)?;

    // Initialize logging
    monitoring::init_telemetry(settings.telemetry());

    info!(
        artifact_dir = %settings.artifact_dir.display(),
        cache = settings.cache_artifacts,
        "Student score predictor starting up..."
    );

    cli::run(args, settings).await
}
