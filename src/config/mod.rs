use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::{PredictorError, PredictorResult};
use crate::ml::artifacts::{ArtifactKind, ArtifactNames};
use crate::monitoring::{LogLevel, TelemetryConfig};

/// Configuration file looked up in the working directory when no
/// explicit path is given (any extension the `config` crate understands).
pub const DEFAULT_CONFIG_FILE: &str = "score-predictor";

/// Prefix for environment overrides, e.g. `SCORE_PREDICTOR_ARTIFACT_DIR`
/// or `SCORE_PREDICTOR_ARTIFACTS__MODEL`.
pub const ENV_PREFIX: &str = "SCORE_PREDICTOR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory the artifact file names are resolved against
    pub artifact_dir: PathBuf,
    pub artifacts: ArtifactNames,
    pub presentation_delay_ms: u64,
    /// Keep loaded artifacts for the rest of the process
    pub cache_artifacts: bool,
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from("."),
            artifacts: ArtifactNames::default(),
            presentation_delay_ms: 2000,
            cache_artifacts: false,
            log_level: LogLevel::Error,
        }
    }
}

impl Settings {
    /// Layer defaults, the configuration file and environment overrides.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> PredictorResult<Self> {
        let defaults = ::config::Config::try_from(&Settings::default()).map_err(config_error)?;

        let file = match path {
            Some(path) => ::config::File::from(path).required(true),
            None => ::config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Settings = ::config::Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_error)?
            .try_deserialize()
            .map_err(config_error)?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> PredictorResult<()> {
        for kind in ArtifactKind::ALL {
            if self.artifacts.file_name(kind).trim().is_empty() {
                return Err(PredictorError::Config(format!(
                    "no file name configured for the {}",
                    kind
                )));
            }
        }
        Ok(())
    }

    pub fn presentation_delay(&self) -> Duration {
        Duration::from_millis(self.presentation_delay_ms)
    }

    pub fn telemetry(&self) -> TelemetryConfig {
        TelemetryConfig {
            log_level: self.log_level,
        }
    }

    /// Effective settings rendered as TOML
    pub fn to_toml(&self) -> PredictorResult<String> {
        toml::to_string_pretty(self).map_err(|e| PredictorError::Config(e.to_string()))
    }
}

fn config_error(e: ::config::ConfigError) -> PredictorError {
    PredictorError::Config(e.to_string())
}
