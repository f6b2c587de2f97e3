use serde::{Deserialize, Serialize};

use super::transform::{check_width, Regressor};
use crate::core::{PredictorError, PredictorResult};

/// Ordinary least squares model fitted offline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressionModel {
    pub coef: Vec<f64>,

    #[serde(default)]
    pub intercept: f64,
}

impl LinearRegressionModel {
    pub fn new(coef: Vec<f64>, intercept: f64) -> PredictorResult<Self> {
        Self { coef, intercept }.validated()
    }

    pub fn validated(self) -> PredictorResult<Self> {
        if self.coef.is_empty() {
            return Err(PredictorError::computation("regression model has no coefficients"));
        }
        if !self.intercept.is_finite() || self.coef.iter().any(|c| !c.is_finite()) {
            return Err(PredictorError::computation(
                "regression model has non-finite parameters",
            ));
        }
        Ok(self)
    }
}

impl Regressor for LinearRegressionModel {
    fn predict(&self, features: &[f64]) -> PredictorResult<f64> {
        check_width("regression model", self.coef.len(), features)?;

        let prediction = self.intercept
            + self
                .coef
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>();

        if !prediction.is_finite() {
            return Err(PredictorError::computation(format!(
                "regression model produced a non-finite value ({})",
                prediction
            )));
        }

        Ok(prediction)
    }

    fn n_features_in(&self) -> usize {
        self.coef.len()
    }
}
