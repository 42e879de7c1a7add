//! Repository Implementation

use crate::StorageError;
use feature_engine::TrainingColumnSchema;
use inference_engine::{ModelArtifact, StandardScaler};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Classifier artifact file name
pub const MODEL_FILE: &str = "model.json";
/// Scaler artifact file name
pub const SCALER_FILE: &str = "scaler.json";
/// Column schema artifact file name
pub const SCHEMA_FILE: &str = "schema.json";

/// Everything needed to score an applicant
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactBundle {
    pub model: ModelArtifact,
    pub scaler: StandardScaler,
    pub schema: TrainingColumnSchema,
}

/// Directory holding one set of training artifacts
#[derive(Debug, Clone)]
pub struct ArtifactRepository {
    dir: PathBuf,
}

impl ArtifactRepository {
    /// Repository rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Artifact directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether all three artifacts are present
    pub fn exists(&self) -> bool {
        [MODEL_FILE, SCALER_FILE, SCHEMA_FILE]
            .iter()
            .all(|name| self.dir.join(name).is_file())
    }

    /// Load the column schema
    pub fn load_schema(&self) -> Result<TrainingColumnSchema, StorageError> {
        self.read_json(SCHEMA_FILE)
    }

    /// Load the fitted scaler
    pub fn load_scaler(&self) -> Result<StandardScaler, StorageError> {
        self.read_json(SCALER_FILE)
    }

    /// Load the classifier description
    pub fn load_model(&self) -> Result<ModelArtifact, StorageError> {
        self.read_json(MODEL_FILE)
    }

    /// Load all three artifacts
    pub fn load_bundle(&self) -> Result<ArtifactBundle, StorageError> {
        info!("Loading artifacts from {}", self.dir.display());
        Ok(ArtifactBundle {
            schema: self.load_schema()?,
            scaler: self.load_scaler()?,
            model: self.load_model()?,
        })
    }

    /// Write all three artifacts, creating the directory if needed
    pub fn save_bundle(&self, bundle: &ArtifactBundle) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;
        self.write_json(SCHEMA_FILE, &bundle.schema)?;
        self.write_json(SCALER_FILE, &bundle.scaler)?;
        self.write_json(MODEL_FILE, &bundle.model)?;
        info!(
            "Saved {} model with {} columns to {}",
            bundle.model.kind(),
            bundle.schema.len(),
            self.dir.display()
        );
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T, StorageError> {
        let path = self.dir.join(name);
        if !path.is_file() {
            return Err(StorageError::NotFound(path));
        }
        let contents = fs::read_to_string(&path).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;
        debug!("Read {} bytes from {}", contents.len(), path.display());
        serde_json::from_str(&contents).map_err(|source| StorageError::Serialization { path, source })
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StorageError> {
        let path = self.dir.join(name);
        let contents = serde_json::to_string_pretty(value).map_err(|source| {
            StorageError::Serialization {
                path: path.clone(),
                source,
            }
        })?;
        fs::write(&path, contents).map_err(|source| StorageError::Io { path, source })
    }
}
