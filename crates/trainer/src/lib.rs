//! Model Training
//!
//! Rebuilds the three scoring artifacts from the German credit dataset:
//! drop-first one-hot encoding, a seeded train/test split, a scaler fitted on
//! the training rows and either a logistic regression or a class-balanced
//! random forest.

mod config;
mod dataset;
mod encoding;
mod forest;
mod logistic;
mod metrics;
mod pipeline;
mod split;

pub use config::{ModelKind, TrainConfig};
pub use dataset::{CreditDataset, DatasetColumn, FieldValue, Record, DATASET_COLUMNS, DATASET_URL};
pub use encoding::{EncodedDataset, OneHotEncoder};
pub use forest::{ForestParams, ForestTrainer};
pub use logistic::{LogisticParams, LogisticTrainer};
pub use metrics::EvaluationMetrics;
pub use pipeline::{fit, train, TrainingReport};
pub use split::{train_test_split, SplitIndices};

use thiserror::Error;

/// Errors while preparing data or fitting models
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("Dataset line {line}: {message}")]
    Dataset { line: usize, message: String },
    #[error("Dataset is empty")]
    EmptyDataset,
    #[error("Training split contains a single class")]
    SingleClass,
    #[error("Dataset download failed: {0}")]
    Download(#[from] reqwest::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Matrix shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("Invalid training parameter: {0}")]
    InvalidParameter(String),
    #[error("Feature error: {0}")]
    Feature(#[from] feature_engine::FeatureError),
    #[error("Inference error: {0}")]
    Inference(#[from] inference_engine::InferenceError),
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),
}
