use crate::core::{PredictorError, PredictorResult};

/// A fitted, stateless mapping from one feature row to another.
pub trait FeatureTransform: Send + Sync {
    /// Transform a single feature row
    fn transform(&self, input: &[f64]) -> PredictorResult<Vec<f64>>;

    /// Width of the rows this transform was fitted on
    fn n_features_in(&self) -> usize;

    /// Width of the rows it produces
    fn n_features_out(&self) -> usize;
}

/// A fitted model producing one scalar per feature row.
pub trait Regressor: Send + Sync {
    fn predict(&self, features: &[f64]) -> PredictorResult<f64>;

    fn n_features_in(&self) -> usize;
}

/// Reject rows whose width differs from what a stage was fitted on.
pub(crate) fn check_width(stage: &str, expected: usize, input: &[f64]) -> PredictorResult<()> {
    if input.len() != expected {
        return Err(PredictorError::computation(format!(
            "{} expects {} features, got {}",
            stage,
            expected,
            input.len()
        )));
    }
    Ok(())
}
