//! Persisted classifier description

use crate::classifier::Classifier;
use crate::forest::RandomForest;
use crate::logistic::LogisticRegression;
use crate::onnx::OnnxClassifier;
use crate::InferenceError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

fn default_probabilities_output() -> usize {
    1
}

/// Classifier artifact as stored next to the scaler and schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression(LogisticRegression),
    RandomForest(RandomForest),
    /// External ONNX graph; `path` is relative to the artifact directory
    Onnx {
        path: PathBuf,
        n_features: usize,
        #[serde(default = "default_probabilities_output")]
        probabilities_output: usize,
    },
}

impl ModelArtifact {
    /// Backend name
    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::LogisticRegression(_) => "logistic_regression",
            ModelArtifact::RandomForest(_) => "random_forest",
            ModelArtifact::Onnx { .. } => "onnx",
        }
    }

    /// Validate and turn the artifact into a ready classifier
    pub fn into_classifier(self, base_dir: &Path) -> Result<Box<dyn Classifier>, InferenceError> {
        info!("Preparing {} classifier", self.kind());
        let classifier: Box<dyn Classifier> = match self {
            ModelArtifact::LogisticRegression(model) => {
                if model.coefficients.iter().any(|w| !w.is_finite()) || !model.intercept.is_finite() {
                    return Err(InferenceError::ModelLoadError(
                        "logistic regression has non-finite weights".to_string(),
                    ));
                }
                Box::new(model)
            }
            ModelArtifact::RandomForest(forest) => {
                forest.validate()?;
                Box::new(forest)
            }
            ModelArtifact::Onnx {
                path,
                n_features,
                probabilities_output,
            } => Box::new(OnnxClassifier::load(
                &base_dir.join(path),
                n_features,
                probabilities_output,
            )?),
        };
        Ok(classifier)
    }
}
