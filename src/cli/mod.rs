pub mod interactive;
pub mod render;

use anyhow::{Result, Context};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;

use crate::config::Settings;
use crate::core::types::{
    ASSIGNMENT_COMPLETION, ATTENDANCE, GROUP_PROJECT, MIDTERM_SCORE, STUDY_HOURS,
};
use crate::core::PredictionRequest;
use crate::ml::{
    ArtifactKind, ArtifactSource, CachedArtifactSource, FileArtifactSource, Prediction,
    PredictionInvoker,
};
use self::interactive::InputCollector;

#[derive(Debug, Parser)]
#[command(name = "score-predictor", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./score-predictor.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the model artifacts
    #[arg(long, global = true)]
    pub artifact_dir: Option<PathBuf>,

    /// Skip the pause before computing a prediction
    #[arg(long, global = true)]
    pub no_delay: bool,

    /// Keep loaded artifacts for the rest of the session
    #[arg(long, global = true)]
    pub cache: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fill in the metrics form and predict (default)
    Interactive,
    /// Predict once from command-line values
    Predict(PredictArgs),
    /// Load the artifacts and show the pipeline shape
    Inspect,
    /// List the input fields with their ranges and defaults
    Fields,
    /// Print the effective configuration as TOML
    ShowConfig,
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    /// Study hours per week (>= 0)
    #[arg(long, default_value_t = STUDY_HOURS.default, allow_negative_numbers = true)]
    pub study_hours: f64,

    /// Attendance percentage [0, 100]
    #[arg(long, default_value_t = ATTENDANCE.default, allow_negative_numbers = true)]
    pub attendance: f64,

    /// Assignment completion percentage [0, 100]
    #[arg(long, default_value_t = ASSIGNMENT_COMPLETION.default, allow_negative_numbers = true)]
    pub assignment_completion: f64,

    /// Midterm score [0, 100]
    #[arg(long, default_value_t = MIDTERM_SCORE.default, allow_negative_numbers = true)]
    pub midterm_score: f64,

    /// Group project participation [0, 1]
    #[arg(long, default_value_t = GROUP_PROJECT.default, allow_negative_numbers = true)]
    pub group_project: f64,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl PredictArgs {
    pub fn to_request(&self) -> Result<PredictionRequest> {
        Ok(PredictionRequest::new(
            self.study_hours,
            self.attendance,
            self.assignment_completion,
            self.midterm_score,
            self.group_project,
        )?)
    }
}

impl Cli {
    /// Fold command-line overrides into the loaded settings.
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(dir) = &self.artifact_dir {
            settings.artifact_dir = dir.clone();
        }
        if self.no_delay {
            settings.presentation_delay_ms = 0;
        }
        if self.cache {
            settings.cache_artifacts = true;
        }
    }
}

/// Artifact source for the configured directory, cached when enabled
pub fn artifact_source(settings: &Settings) -> Box<dyn ArtifactSource> {
    let files = FileArtifactSource::new(&settings.artifact_dir, settings.artifacts.clone());
    if settings.cache_artifacts {
        Box::new(CachedArtifactSource::new(files))
    } else {
        Box::new(files)
    }
}

pub async fn run(cli: Cli, settings: Settings) -> Result<ExitCode> {
    let invoker = PredictionInvoker::new(artifact_source(&settings))
        .with_presentation_delay(settings.presentation_delay());

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => run_interactive(&invoker).await,
        Commands::Predict(args) => run_predict(&invoker, &args).await,
        Commands::Inspect => run_inspect(&invoker, &settings),
        Commands::Fields => {
            render::fields();
            Ok(ExitCode::SUCCESS)
        }
        Commands::ShowConfig => {
            print!("{}", settings.to_toml()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_interactive(invoker: &PredictionInvoker<Box<dyn ArtifactSource>>) -> Result<ExitCode> {
    render::banner();

    let mut request = PredictionRequest::default();
    loop {
        request = InputCollector::collect(&request)?;

        if InputCollector::confirm_predict()? {
            match predict_with_spinner(invoker, &request).await {
                Ok(prediction) => {
                    render::prediction(&prediction);
                    render::scenario_note();
                }
                Err(e) => render::failure(&e),
            }
        }

        if !InputCollector::confirm_another()? {
            break;
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn run_predict(
    invoker: &PredictionInvoker<Box<dyn ArtifactSource>>,
    args: &PredictArgs,
) -> Result<ExitCode> {
    let request = args.to_request()?;
    info!(?request, "Predicting from command-line values");

    match predict_with_spinner(invoker, &request).await {
        Ok(prediction) => {
            println!("{}", predict_output(&prediction, args.json)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            render::failure(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// What `predict` writes to stdout: the result line or a JSON document
fn predict_output(prediction: &Prediction, json: bool) -> Result<String> {
    if !json {
        return Ok(prediction.to_string());
    }

    let output = serde_json::json!({
        "score": prediction.score,
        "formatted": prediction.formatted_score(),
        "request": prediction.request,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

fn run_inspect(
    invoker: &PredictionInvoker<Box<dyn ArtifactSource>>,
    settings: &Settings,
) -> Result<ExitCode> {
    let bundle = match invoker.source().load() {
        Ok(bundle) => bundle,
        Err(e) => {
            render::failure(&e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let files: Vec<(String, String)> = ArtifactKind::ALL
        .into_iter()
        .map(|kind| {
            let path = settings.artifact_dir.join(settings.artifacts.file_name(kind));
            (kind.to_string(), path.display().to_string())
        })
        .collect();

    render::pipeline(&bundle.describe(), &files);
    Ok(ExitCode::SUCCESS)
}

async fn predict_with_spinner(
    invoker: &PredictionInvoker<Box<dyn ArtifactSource>>,
    request: &PredictionRequest,
) -> Result<Prediction, crate::core::PredictorError> {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message("Running prediction... Please wait");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = invoker.predict(request).await;
    spinner.finish_and_clear();
    result
}

/// Load settings for `cli`, honouring `--config` and command-line overrides.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    cli.apply_overrides(&mut settings);
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn predict_args(flags: &[&str]) -> PredictArgs {
        let argv = ["score-predictor", "predict"].iter().chain(flags);
        match Cli::try_parse_from(argv).unwrap().command {
            Some(Commands::Predict(args)) => args,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    fn invoker_over(dir: &std::path::Path) -> PredictionInvoker<Box<dyn ArtifactSource>> {
        let settings = Settings {
            artifact_dir: dir.to_path_buf(),
            ..Settings::default()
        };
        PredictionInvoker::new(artifact_source(&settings))
    }

    fn sample_prediction() -> Prediction {
        Prediction {
            request: PredictionRequest::default(),
            score: 71.456,
        }
    }

    #[test]
    fn test_predict_prints_the_result_line() {
        let output = predict_output(&sample_prediction(), false).unwrap();
        assert_eq!(output, "Predicted final exam score is 71.46");
    }

    #[test]
    fn test_predict_json_payload() {
        let output = predict_output(&sample_prediction(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["score"], serde_json::json!(71.456));
        assert_eq!(value["formatted"], "71.46");
        assert_eq!(value["request"]["attendance"], serde_json::json!(82.5));
        assert_eq!(value["request"]["group_project"], serde_json::json!(0.0));
        assert_eq!(value.as_object().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_predict_succeeds_with_demo_artifacts() {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join("artifacts");
        let code = run_predict(&invoker_over(&dir), &predict_args(&["--json"])).await.unwrap();
        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::SUCCESS));
    }

    #[tokio::test]
    async fn test_predict_exits_with_failure_without_artifacts() {
        let dir = tempdir().unwrap();
        let code = run_predict(&invoker_over(dir.path()), &predict_args(&[])).await.unwrap();
        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::FAILURE));
    }

    #[tokio::test]
    async fn test_predict_rejects_out_of_range_flags() {
        let dir = tempdir().unwrap();
        let result = run_predict(&invoker_over(dir.path()), &predict_args(&["--attendance", "150"])).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["score-predictor"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_predict_flags_default_to_field_defaults() {
        let cli = Cli::try_parse_from(["score-predictor", "predict"]).unwrap();
        match cli.command {
            Some(Commands::Predict(args)) => {
                let request = args.to_request().unwrap();
                assert_eq!(request, PredictionRequest::default());
                assert!(!args.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_flag_is_rejected_before_prediction() {
        let cli = Cli::try_parse_from(["score-predictor", "predict", "--attendance", "150"]).unwrap();
        match cli.command {
            Some(Commands::Predict(args)) => {
                let err = args.to_request().unwrap_err();
                assert!(err.to_string().contains("Attendance (%)"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_negative_values_parse_then_fail_validation() {
        let cli =
            Cli::try_parse_from(["score-predictor", "predict", "--study-hours", "-3"]).unwrap();
        match cli.command {
            Some(Commands::Predict(args)) => assert!(args.to_request().is_err()),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::try_parse_from([
            "score-predictor",
            "inspect",
            "--artifact-dir",
            "models",
            "--no-delay",
            "--cache",
        ])
        .unwrap();

        let mut settings = Settings::default();
        cli.apply_overrides(&mut settings);
        assert_eq!(settings.artifact_dir, PathBuf::from("models"));
        assert_eq!(settings.presentation_delay_ms, 0);
        assert!(settings.cache_artifacts);
    }
}
