use serde::{Deserialize, Serialize};

use super::transform::{check_width, FeatureTransform};
use crate::core::{PredictorError, PredictorResult};

/// Column subset chosen during training
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSelector {
    /// One flag per input column; `true` keeps the column
    pub support: Vec<bool>,
}

impl FeatureSelector {
    pub fn new(support: Vec<bool>) -> PredictorResult<Self> {
        Self { support }.validated()
    }

    pub fn validated(self) -> PredictorResult<Self> {
        if !self.support.iter().any(|&keep| keep) {
            return Err(PredictorError::computation("feature selector keeps no columns"));
        }
        Ok(self)
    }

    /// Indices of the kept columns, in input order
    pub fn selected_columns(&self) -> Vec<usize> {
        self.support
            .iter()
            .enumerate()
            .filter_map(|(i, &keep)| keep.then_some(i))
            .collect()
    }
}

impl FeatureTransform for FeatureSelector {
    fn transform(&self, input: &[f64]) -> PredictorResult<Vec<f64>> {
        check_width("feature selector", self.support.len(), input)?;

        Ok(input
            .iter()
            .zip(&self.support)
            .filter(|(_, &keep)| keep)
            .map(|(&x, _)| x)
            .collect())
    }

    fn n_features_in(&self) -> usize {
        self.support.len()
    }

    fn n_features_out(&self) -> usize {
        self.support.iter().filter(|&&keep| keep).count()
    }
}
