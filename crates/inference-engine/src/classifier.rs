//! Classifier capability

use crate::InferenceError;

/// Pre-fitted binary classifier over a scaled feature row
///
/// Class 1 is a creditworthy applicant, class 0 a bad credit risk.
pub trait Classifier: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &str;

    /// Input width the classifier was fitted on, when known
    fn n_features(&self) -> Option<usize>;

    /// Class probabilities `[p0, p1]`
    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], InferenceError>;

    /// Hard label; ties go to class 0
    fn predict(&self, row: &[f64]) -> Result<u8, InferenceError> {
        self.predict_proba(row).map(label_for)
    }
}

/// Argmax over `[p0, p1]`, ties to class 0
pub fn label_for(probabilities: [f64; 2]) -> u8 {
    u8::from(probabilities[1] > probabilities[0])
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn n_features(&self) -> Option<usize> {
        (**self).n_features()
    }

    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], InferenceError> {
        (**self).predict_proba(row)
    }

    fn predict(&self, row: &[f64]) -> Result<u8, InferenceError> {
        (**self).predict(row)
    }
}

pub(crate) fn check_width(expected: usize, row: &[f64]) -> Result<(), InferenceError> {
    if row.len() == expected {
        Ok(())
    } else {
        Err(InferenceError::InvalidInputShape {
            expected,
            actual: row.len(),
        })
    }
}

/// Classifier that ignores its input and returns fixed probabilities
///
/// Used for dry runs and for wiring tests of the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct ConstantClassifier {
    probabilities: [f64; 2],
}

impl ConstantClassifier {
    /// Classifier that always answers `[1 - p_good, p_good]`
    pub fn new(p_good: f64) -> Self {
        Self {
            probabilities: [1.0 - p_good, p_good],
        }
    }
}

impl Classifier for ConstantClassifier {
    fn name(&self) -> &str {
        "constant"
    }

    fn n_features(&self) -> Option<usize> {
        None
    }

    fn predict_proba(&self, _row: &[f64]) -> Result<[f64; 2], InferenceError> {
        Ok(self.probabilities)
    }
}
