use serde::{Deserialize, Serialize};

use super::transform::{check_width, FeatureTransform};
use crate::core::{PredictorError, PredictorResult};

/// Per-column standardisation fitted offline.
///
/// Either half may be absent, in which case that half is the identity.
/// A fitted scale of zero (constant column) divides by one instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    #[serde(default)]
    pub mean: Option<Vec<f64>>,

    #[serde(default)]
    pub scale: Option<Vec<f64>>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> PredictorResult<Self> {
        Self {
            mean: Some(mean),
            scale: Some(scale),
        }
        .validated()
    }

    pub fn validated(self) -> PredictorResult<Self> {
        match (&self.mean, &self.scale) {
            (None, None) => Err(PredictorError::computation(
                "scaler has neither mean nor scale",
            )),
            (Some(mean), Some(scale)) if mean.len() != scale.len() => {
                Err(PredictorError::computation(format!(
                    "scaler mean has {} columns but scale has {}",
                    mean.len(),
                    scale.len()
                )))
            }
            _ => Ok(self),
        }
    }

    fn width(&self) -> usize {
        self.mean
            .as_ref()
            .or(self.scale.as_ref())
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl FeatureTransform for StandardScaler {
    fn transform(&self, input: &[f64]) -> PredictorResult<Vec<f64>> {
        check_width("scaler", self.width(), input)?;

        let output = input
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let centered = match &self.mean {
                    Some(mean) => x - mean[i],
                    None => x,
                };
                match &self.scale {
                    Some(scale) if scale[i] != 0.0 => centered / scale[i],
                    _ => centered,
                }
            })
            .collect();

        Ok(output)
    }

    fn n_features_in(&self) -> usize {
        self.width()
    }

    fn n_features_out(&self) -> usize {
        self.width()
    }
}
