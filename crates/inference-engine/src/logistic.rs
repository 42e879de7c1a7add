//! Logistic regression

use crate::classifier::{check_width, Classifier};
use crate::InferenceError;
use serde::{Deserialize, Serialize};

/// Fitted logistic regression over scaled features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// One weight per feature column
    pub coefficients: Vec<f64>,
    /// Bias term
    pub intercept: f64,
}

impl LogisticRegression {
    /// Raw decision value `w·x + b`
    pub fn decision_function(&self, row: &[f64]) -> Result<f64, InferenceError> {
        check_width(self.coefficients.len(), row)?;
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(row)
            .map(|(w, x)| w * x)
            .sum();
        Ok(dot + self.intercept)
    }
}

/// Logistic function without overflow for large |z|
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &str {
        "logistic_regression"
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], InferenceError> {
        let p_good = sigmoid(self.decision_function(row)?);
        Ok([1.0 - p_good, p_good])
    }
}
