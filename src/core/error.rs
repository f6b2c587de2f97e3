use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("Error loading transformation objects or model: {artifact} ({}): {reason}", .path.display())]
    ArtifactLoad {
        artifact: String,
        path: PathBuf,
        reason: String,
    },

    #[error("Prediction failed: {0}")]
    Computation(String),

    #[error("Invalid value {value} for {field}: {reason}")]
    InvalidInput {
        field: String,
        value: f64,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PredictorError {
    pub fn computation(message: impl Into<String>) -> Self {
        Self::Computation(message.into())
    }

    /// Failures that abort a prediction once it has been triggered.
    pub fn is_artifact_or_computation(&self) -> bool {
        matches!(self, Self::ArtifactLoad { .. } | Self::Computation(_))
    }
}

pub type PredictorResult<T> = Result<T, PredictorError>;
