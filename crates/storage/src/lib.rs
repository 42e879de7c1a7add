//! Artifact Storage
//!
//! Keeps the three training artifacts (classifier, scaler, column schema)
//! together in one directory as JSON documents.

mod repository;

pub use repository::{ArtifactBundle, ArtifactRepository, MODEL_FILE, SCALER_FILE, SCHEMA_FILE};

use std::path::PathBuf;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Artifact not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Serialization error in {}: {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
