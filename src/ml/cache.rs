use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use super::artifacts::{ArtifactBundle, ArtifactKind, ArtifactSource, FileArtifactSource};
use crate::core::{PredictorError, PredictorResult};

/// The four resolved artifact paths, in chain order
type CacheKey = [PathBuf; 4];

// Process-wide bundles keyed by artifact files. Never invalidated.
lazy_static::lazy_static! {
    static ref BUNDLE_CACHE: Mutex<HashMap<CacheKey, Arc<ArtifactBundle>>> =
        Mutex::new(HashMap::new());
}

/// Loads through a [`FileArtifactSource`] once per set of artifact files
/// and reuses the result. Failed loads are not cached, so the next call
/// retries.
pub struct CachedArtifactSource {
    inner: FileArtifactSource,
}

impl CachedArtifactSource {
    pub fn new(inner: FileArtifactSource) -> Self {
        Self { inner }
    }

    fn key(&self) -> CacheKey {
        let dir = self
            .inner
            .dir()
            .canonicalize()
            .unwrap_or_else(|_| self.inner.dir().to_path_buf());
        ArtifactKind::ALL.map(|kind| dir.join(self.inner.names().file_name(kind)))
    }
}

impl ArtifactSource for CachedArtifactSource {
    fn load(&self) -> PredictorResult<Arc<ArtifactBundle>> {
        let key = self.key();
        let dir = self.inner.dir().display();

        // The lock is held across the load so concurrent callers share one read.
        let mut cache = BUNDLE_CACHE
            .lock()
            .map_err(|_| PredictorError::computation("artifact cache lock poisoned"))?;

        if let Some(bundle) = cache.get(&key) {
            debug!(%dir, "Using cached prediction artifacts");
            return Ok(Arc::clone(bundle));
        }

        match self.inner.load() {
            Ok(bundle) => {
                cache.insert(key, Arc::clone(&bundle));
                Ok(bundle)
            }
            Err(e) => {
                warn!(%dir, error = %e, "Artifact load failed, not caching");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::artifacts::ArtifactNames;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    const MODEL_FILE: &str = "linear_regression_(poly)_student_performance_model.json";

    /// Identity chain over five inputs: score = intercept + sum of inputs
    fn write_artifacts(dir: &Path, intercept: f64) {
        fs::write(dir.join("poly.json"), r#"{"degree": 1, "include_bias": false, "n_features_in": 5}"#).unwrap();
        fs::write(dir.join("poly_scaler.json"), r#"{"mean": [0, 0, 0, 0, 0], "scale": [1, 1, 1, 1, 1]}"#).unwrap();
        fs::write(dir.join("selector.json"), r#"{"support": [true, true, true, true, true]}"#).unwrap();
        write_model(dir, MODEL_FILE, intercept);
    }

    fn write_model(dir: &Path, file: &str, intercept: f64) {
        fs::write(
            dir.join(file),
            format!(r#"{{"coef": [1.0, 1.0, 1.0, 1.0, 1.0], "intercept": {}}}"#, intercept),
        )
        .unwrap();
    }

    const ROW: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];

    #[test]
    fn test_second_load_reuses_bundle() {
        let dir = tempdir().unwrap();
        write_artifacts(dir.path(), 5.0);
        let source = CachedArtifactSource::new(FileArtifactSource::new(dir.path(), ArtifactNames::default()));

        let first = source.load().unwrap();
        // Changing the files has no effect once cached
        write_artifacts(dir.path(), 50.0);
        let second = source.load().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.run(&ROW).unwrap(), 20.0);
    }

    #[test]
    fn test_failed_load_is_retried() {
        let dir = tempdir().unwrap();
        let source = CachedArtifactSource::new(FileArtifactSource::new(dir.path(), ArtifactNames::default()));

        assert!(source.load().is_err());

        write_artifacts(dir.path(), 0.0);
        let bundle = source.load().unwrap();
        assert_eq!(bundle.run(&ROW).unwrap(), 15.0);
    }

    #[test]
    fn test_file_names_are_part_of_the_key() {
        let dir = tempdir().unwrap();
        write_artifacts(dir.path(), 0.0);
        write_model(dir.path(), "ridge.json", 100.0);

        let ridge_names = ArtifactNames {
            model: "ridge.json".to_string(),
            ..ArtifactNames::default()
        };
        let default_source =
            CachedArtifactSource::new(FileArtifactSource::new(dir.path(), ArtifactNames::default()));
        let ridge_source = CachedArtifactSource::new(FileArtifactSource::new(dir.path(), ridge_names));

        let default_bundle = default_source.load().unwrap();
        let ridge_bundle = ridge_source.load().unwrap();

        assert!(!Arc::ptr_eq(&default_bundle, &ridge_bundle));
        assert_eq!(default_bundle.run(&ROW).unwrap(), 15.0);
        assert_eq!(ridge_bundle.run(&ROW).unwrap(), 115.0);
    }
}
