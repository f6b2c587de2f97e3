pub mod error;
pub mod types;

pub use error::{PredictorError, PredictorResult};
pub use types::{InputField, PredictionRequest, INPUT_FIELDS};
