use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::linear::LinearRegressionModel;
use super::polynomial::PolynomialFeatures;
use super::scaler::StandardScaler;
use super::selector::FeatureSelector;
use super::transform::{FeatureTransform, Regressor};
use crate::core::{PredictorError, PredictorResult, INPUT_FIELDS};

/// The four artifacts making up the prediction chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    PolynomialExpander,
    Scaler,
    Selector,
    Model,
}

impl ArtifactKind {
    /// Chain order
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::PolynomialExpander,
        ArtifactKind::Scaler,
        ArtifactKind::Selector,
        ArtifactKind::Model,
    ];
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::PolynomialExpander => "polynomial expander",
            ArtifactKind::Scaler => "scaler",
            ArtifactKind::Selector => "feature selector",
            ArtifactKind::Model => "regression model",
        };
        write!(f, "{}", name)
    }
}

/// File names of the artifacts, relative to the artifact directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactNames {
    pub poly: String,
    pub scaler: String,
    pub selector: String,
    pub model: String,
}

impl Default for ArtifactNames {
    fn default() -> Self {
        Self {
            poly: "poly.json".to_string(),
            scaler: "poly_scaler.json".to_string(),
            selector: "selector.json".to_string(),
            model: "linear_regression_(poly)_student_performance_model.json".to_string(),
        }
    }
}

impl ArtifactNames {
    pub fn file_name(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::PolynomialExpander => &self.poly,
            ArtifactKind::Scaler => &self.scaler,
            ArtifactKind::Selector => &self.selector,
            ArtifactKind::Model => &self.model,
        }
    }
}

/// Feature widths at each stage of a loaded chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineShape {
    pub input_features: usize,
    pub expanded_features: usize,
    pub scaled_features: usize,
    pub selected_features: usize,
    pub model_features: usize,
}

impl fmt::Display for PipelineShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} inputs -> {} expanded -> {} scaled -> {} selected -> 1 score",
            self.input_features, self.expanded_features, self.scaled_features, self.selected_features
        )
    }
}

/// Loaded transformation chain plus regressor
pub struct ArtifactBundle {
    expander: Box<dyn FeatureTransform>,
    scaler: Box<dyn FeatureTransform>,
    selector: Box<dyn FeatureTransform>,
    regressor: Box<dyn Regressor>,
}

impl ArtifactBundle {
    /// Assemble a chain, checking that each stage feeds the next.
    pub fn new(
        expander: Box<dyn FeatureTransform>,
        scaler: Box<dyn FeatureTransform>,
        selector: Box<dyn FeatureTransform>,
        regressor: Box<dyn Regressor>,
    ) -> PredictorResult<Self> {
        let links = [
            ("scaler", expander.n_features_out(), scaler.n_features_in()),
            ("feature selector", scaler.n_features_out(), selector.n_features_in()),
            ("regression model", selector.n_features_out(), regressor.n_features_in()),
        ];
        for (stage, produced, expected) in links {
            if produced != expected {
                return Err(PredictorError::computation(format!(
                    "{} expects {} features but the previous stage produces {}",
                    stage, expected, produced
                )));
            }
        }

        Ok(Self {
            expander,
            scaler,
            selector,
            regressor,
        })
    }

    pub fn describe(&self) -> PipelineShape {
        PipelineShape {
            input_features: self.expander.n_features_in(),
            expanded_features: self.expander.n_features_out(),
            scaled_features: self.scaler.n_features_out(),
            selected_features: self.selector.n_features_out(),
            model_features: self.regressor.n_features_in(),
        }
    }

    /// Run one row through expander, scaler, selector and regressor.
    pub fn run(&self, input: &[f64]) -> PredictorResult<f64> {
        let expanded = self.expander.transform(input)?;
        let scaled = self.scaler.transform(&expanded)?;
        let selected = self.selector.transform(&scaled)?;
        debug!(?selected, "Selected features");

        self.regressor.predict(&selected)
    }
}

/// Where a prediction gets its artifacts from
pub trait ArtifactSource: Send + Sync {
    fn load(&self) -> PredictorResult<Arc<ArtifactBundle>>;
}

impl<T: ArtifactSource + ?Sized> ArtifactSource for Box<T> {
    fn load(&self) -> PredictorResult<Arc<ArtifactBundle>> {
        (**self).load()
    }
}

/// Reads the four JSON artifacts from a directory on every load
#[derive(Debug, Clone)]
pub struct FileArtifactSource {
    dir: PathBuf,
    names: ArtifactNames,
}

impl FileArtifactSource {
    pub fn new(dir: impl Into<PathBuf>, names: ArtifactNames) -> Self {
        Self {
            dir: dir.into(),
            names,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn names(&self) -> &ArtifactNames {
        &self.names
    }

    pub fn path_of(&self, kind: ArtifactKind) -> PathBuf {
        self.dir.join(self.names.file_name(kind))
    }

    fn read<T, F>(&self, kind: ArtifactKind, finish: F) -> PredictorResult<T>
    where
        T: DeserializeOwned,
        F: FnOnce(T) -> PredictorResult<T>,
    {
        let path = self.path_of(kind);
        let load_error = |reason: String| PredictorError::ArtifactLoad {
            artifact: kind.to_string(),
            path: path.clone(),
            reason,
        };

        let content = fs::read_to_string(&path).map_err(|e| load_error(e.to_string()))?;
        let artifact: T = serde_json::from_str(&content).map_err(|e| load_error(e.to_string()))?;
        finish(artifact).map_err(|e| match e {
            PredictorError::Computation(message) => load_error(message),
            other => load_error(other.to_string()),
        })
    }
}

impl ArtifactSource for FileArtifactSource {
    fn load(&self) -> PredictorResult<Arc<ArtifactBundle>> {
        let poly: PolynomialFeatures = self.read(ArtifactKind::PolynomialExpander, |poly: PolynomialFeatures| {
            let poly = poly.fitted()?;
            if poly.n_features_in != INPUT_FIELDS.len() {
                return Err(PredictorError::computation(format!(
                    "fitted on {} input features but requests carry {}",
                    poly.n_features_in,
                    INPUT_FIELDS.len()
                )));
            }
            Ok(poly)
        })?;
        let scaler: StandardScaler = self.read(ArtifactKind::Scaler, StandardScaler::validated)?;
        let selector: FeatureSelector =
            self.read(ArtifactKind::Selector, FeatureSelector::validated)?;
        let model: LinearRegressionModel =
            self.read(ArtifactKind::Model, LinearRegressionModel::validated)?;

        let bundle = ArtifactBundle::new(
            Box::new(poly),
            Box::new(scaler),
            Box::new(selector),
            Box::new(model),
        )?;

        info!(dir = %self.dir.display(), shape = %bundle.describe(), "Loaded prediction artifacts");
        Ok(Arc::new(bundle))
    }
}

/// Artifacts already held in memory
pub struct StaticArtifactSource {
    bundle: Arc<ArtifactBundle>,
}

impl StaticArtifactSource {
    pub fn new(bundle: ArtifactBundle) -> Self {
        Self {
            bundle: Arc::new(bundle),
        }
    }
}

impl ArtifactSource for StaticArtifactSource {
    fn load(&self) -> PredictorResult<Arc<ArtifactBundle>> {
        Ok(Arc::clone(&self.bundle))
    }
}
