// Prediction pipeline: fitted artifacts and the invoker that runs them

pub mod artifacts;
pub mod cache;
pub mod invoker;
pub mod linear;
pub mod polynomial;
pub mod scaler;
pub mod selector;
pub mod transform;

// Expose key types and functions
pub use artifacts::{
    ArtifactBundle,
    ArtifactKind,
    ArtifactNames,
    ArtifactSource,
    FileArtifactSource,
    PipelineShape,
    StaticArtifactSource,
};
pub use cache::CachedArtifactSource;
pub use invoker::{Prediction, PredictionInvoker};
pub use transform::{FeatureTransform, Regressor};
