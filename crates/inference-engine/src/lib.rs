//! Scaler/Classifier Adapter
//!
//! Applies the scaler fitted at training time and a pre-fitted binary
//! classifier to an aligned feature vector. Classifiers are interchangeable
//! behind the [`Classifier`] trait: logistic regression, random forest, or an
//! ONNX graph run through tract.

mod artifact;
mod classifier;
mod engine;
mod forest;
mod logistic;
mod onnx;
mod scaler;

pub use artifact::ModelArtifact;
pub use classifier::{label_for, Classifier, ConstantClassifier};
pub use engine::{InferenceEngine, RawPrediction};
pub use forest::{DecisionTree, RandomForest, TreeNode};
pub use logistic::{sigmoid, LogisticRegression};
pub use onnx::OnnxClassifier;
pub use scaler::StandardScaler;

use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected} columns, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },
    #[error("Classifier returned invalid probabilities {0:?}")]
    InvalidProbabilities([f64; 2]),
}
