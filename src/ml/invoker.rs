use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::artifacts::ArtifactSource;
use crate::core::{PredictionRequest, PredictorError, PredictorResult};
use crate::track_performance;

/// Outcome of one successful prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub request: PredictionRequest,
    pub score: f64,
}

impl Prediction {
    /// Score rounded to two decimals for display
    pub fn formatted_score(&self) -> String {
        format!("{:.2}", self.score)
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicted final exam score is {}", self.formatted_score())
    }
}

/// Loads artifacts and runs one request through them
pub struct PredictionInvoker<S: ArtifactSource> {
    source: S,
    presentation_delay: Duration,
}

impl<S: ArtifactSource> PredictionInvoker<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            presentation_delay: Duration::ZERO,
        }
    }

    /// Pause this long before computing, for pacing the UI.
    pub fn with_presentation_delay(mut self, delay: Duration) -> Self {
        self.presentation_delay = delay;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Predict a final exam score.
    ///
    /// Any load or computation failure aborts the whole request; nothing
    /// is retried and no partial result is returned.
    pub async fn predict(&self, request: &PredictionRequest) -> PredictorResult<Prediction> {
        track_performance!("prediction");

        if !self.presentation_delay.is_zero() {
            tokio::time::sleep(self.presentation_delay).await;
        }

        let result = self.compute(request);
        match &result {
            Ok(prediction) => info!(score = prediction.score, "Prediction complete"),
            Err(e) => warn!(error = %e, "Prediction failed"),
        }
        result
    }

    fn compute(&self, request: &PredictionRequest) -> PredictorResult<Prediction> {
        // Fields are public, so a hand-built request may bypass `new`
        let input = PredictionRequest::from_values(request.to_vector())?.to_vector();
        debug!(?input, "Running prediction");

        let bundle = self.source.load()?;
        let score = bundle.run(&input)?;

        if !score.is_finite() {
            return Err(PredictorError::computation(format!(
                "model produced a non-finite score ({})",
                score
            )));
        }

        Ok(Prediction {
            request: *request,
            score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::artifacts::{ArtifactBundle, StaticArtifactSource};
    use crate::ml::linear::LinearRegressionModel;
    use crate::ml::polynomial::PolynomialFeatures;
    use crate::ml::scaler::StandardScaler;
    use crate::ml::selector::FeatureSelector;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    /// score = 40 + 0.5 * midterm + 10 * group_project
    fn linear_bundle() -> ArtifactBundle {
        let poly = PolynomialFeatures::new(1, 5).unwrap();
        let scaler = StandardScaler::new(vec![0.0; 6], vec![1.0; 6]).unwrap();
        let selector = FeatureSelector::new(vec![false, false, false, false, true, true]).unwrap();
        let model = LinearRegressionModel::new(vec![0.5, 10.0], 40.0).unwrap();
        ArtifactBundle::new(Box::new(poly), Box::new(scaler), Box::new(selector), Box::new(model))
            .unwrap()
    }

    struct FailingSource;

    impl ArtifactSource for FailingSource {
        fn load(&self) -> PredictorResult<Arc<ArtifactBundle>> {
            Err(PredictorError::ArtifactLoad {
                artifact: "regression model".to_string(),
                path: "model.json".into(),
                reason: "permission denied".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_predicts_with_fields_in_order() {
        let invoker = PredictionInvoker::new(StaticArtifactSource::new(linear_bundle()));
        let request = PredictionRequest::new(11.5, 82.5, 78.4, 80.0, 1.0).unwrap();

        let prediction = invoker.predict(&request).await.unwrap();
        assert_eq!(prediction.score, 90.0);
        assert_eq!(prediction.to_string(), "Predicted final exam score is 90.00");
    }

    #[tokio::test]
    async fn test_repeated_predictions_are_identical() {
        let invoker = PredictionInvoker::new(StaticArtifactSource::new(linear_bundle()));
        let request = PredictionRequest::default();

        let first = invoker.predict(&request).await.unwrap();
        let second = invoker.predict(&request).await.unwrap();
        assert_eq!(first.score.to_bits(), second.score.to_bits());
    }

    #[tokio::test]
    async fn test_load_failure_aborts_prediction() {
        let invoker = PredictionInvoker::new(FailingSource);
        let err = invoker.predict(&PredictionRequest::default()).await.unwrap_err();

        assert!(err.is_artifact_or_computation());
        assert!(err.to_string().contains("permission denied"));
    }

    #[tokio::test]
    async fn test_unvalidated_request_is_rejected() {
        let invoker = PredictionInvoker::new(StaticArtifactSource::new(linear_bundle()));
        let request = PredictionRequest {
            attendance: 150.0,
            ..PredictionRequest::default()
        };

        match invoker.predict(&request).await {
            Err(err @ PredictorError::InvalidInput { .. }) => {
                assert!(err.to_string().contains("Attendance (%)"));
            }
            other => panic!("expected attendance to be rejected, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_presentation_delay_is_applied() {
        let invoker = PredictionInvoker::new(StaticArtifactSource::new(linear_bundle()))
            .with_presentation_delay(Duration::from_secs(2));

        let started = tokio::time::Instant::now();
        invoker.predict(&PredictionRequest::default()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(2));
    }

    #[test]
    fn test_formatted_score_has_two_decimals() {
        let prediction = Prediction {
            request: PredictionRequest::default(),
            score: 71.0,
        };
        assert_eq!(prediction.formatted_score(), "71.00");

        let prediction = Prediction {
            request: PredictionRequest::default(),
            score: 68.456,
        };
        assert_eq!(prediction.formatted_score(), "68.46");
    }
}
