//! Training configuration

use crate::dataset::DATASET_URL;
use crate::TrainingError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Classifier family to fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    LogisticRegression,
    RandomForest,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::LogisticRegression => "logistic_regression",
            ModelKind::RandomForest => "random_forest",
        }
    }
}

/// Training run parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Local copy of `german.data`; downloaded here when absent
    pub dataset_path: Option<PathBuf>,
    pub dataset_url: String,
    pub model: ModelKind,
    pub test_ratio: f64,
    pub seed: u64,
    /// Forest size
    pub n_trees: usize,
    /// Forest depth limit; unlimited when absent
    pub max_depth: Option<usize>,
    /// Gradient descent iterations for logistic regression
    pub epochs: usize,
    pub learning_rate: f64,
    /// Inverse L2 regularization strength for logistic regression
    pub c: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            dataset_url: DATASET_URL.to_string(),
            model: ModelKind::RandomForest,
            test_ratio: 0.2,
            seed: 42,
            n_trees: 100,
            max_depth: None,
            epochs: 2000,
            learning_rate: 0.1,
            c: 1.0,
        }
    }
}

impl TrainConfig {
    /// Reject parameters no fit can use
    pub fn validate(&self) -> Result<(), TrainingError> {
        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(TrainingError::InvalidParameter(format!(
                "test_ratio must lie in (0, 1), got {}",
                self.test_ratio
            )));
        }
        if self.n_trees == 0 {
            return Err(TrainingError::InvalidParameter("n_trees must be positive".to_string()));
        }
        if self.max_depth == Some(0) {
            return Err(TrainingError::InvalidParameter("max_depth must be positive".to_string()));
        }
        if self.epochs == 0 || !(self.learning_rate > 0.0) || !(self.c > 0.0) {
            return Err(TrainingError::InvalidParameter(
                "epochs, learning_rate and c must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = TrainConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model, ModelKind::RandomForest);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TrainConfig =
            serde_json::from_str(r#"{"model": "logistic_regression", "n_trees": 10}"#).unwrap();
        assert_eq!(config.model, ModelKind::LogisticRegression);
        assert_eq!(config.n_trees, 10);
        assert_eq!(config.test_ratio, 0.2);
    }

    #[test]
    fn test_invalid_ratio() {
        let config = TrainConfig {
            test_ratio: 1.0,
            ..TrainConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
