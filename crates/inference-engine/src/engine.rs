//! Inference Engine Implementation

use crate::classifier::{label_for, Classifier};
use crate::scaler::StandardScaler;
use crate::InferenceError;
use feature_engine::FeatureVector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Probability mass tolerated outside [0, 1] and away from a unit sum
const PROBABILITY_TOLERANCE: f64 = 1e-4;

/// Classifier output before any business rule is applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPrediction {
    /// Hard label: 1 creditworthy, 0 bad risk
    pub label: u8,
    /// Class probabilities `[p0, p1]`
    pub probabilities: [f64; 2],
}

impl RawPrediction {
    /// Probability of the predicted label
    pub fn label_probability(&self) -> f64 {
        self.probabilities[usize::from(self.label.min(1))]
    }
}

/// Scaler and classifier loaded once, then used read-only
pub struct InferenceEngine {
    scaler: StandardScaler,
    classifier: Box<dyn Classifier>,
    width: usize,
}

impl InferenceEngine {
    /// Create an engine for feature rows of `width` columns
    pub fn new(
        scaler: StandardScaler,
        classifier: Box<dyn Classifier>,
        width: usize,
    ) -> Result<Self, InferenceError> {
        scaler.validate()?;
        if scaler.width() != width {
            return Err(InferenceError::InvalidInputShape {
                expected: width,
                actual: scaler.width(),
            });
        }
        if let Some(n_features) = classifier.n_features() {
            if n_features != width {
                return Err(InferenceError::InvalidInputShape {
                    expected: width,
                    actual: n_features,
                });
            }
        }

        info!(
            "Inference engine ready: {} classifier, {} columns",
            classifier.name(),
            width
        );

        Ok(Self {
            scaler,
            classifier,
            width,
        })
    }

    /// Scale a feature row and classify it
    pub fn predict(&self, features: &FeatureVector) -> Result<RawPrediction, InferenceError> {
        let start = std::time::Instant::now();

        if features.len() != self.width {
            return Err(InferenceError::InvalidInputShape {
                expected: self.width,
                actual: features.len(),
            });
        }

        let scaled = self.scaler.transform(features.as_slice())?;
        let probabilities = self.classifier.predict_proba(&scaled)?;
        check_probabilities(probabilities)?;
        let label = label_for(probabilities);

        debug!(
            "Inference completed in {}us: label={} p={:?}",
            start.elapsed().as_micros(),
            label,
            probabilities
        );

        Ok(RawPrediction {
            label,
            probabilities,
        })
    }

    /// Name of the classifier backend
    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Feature row width
    pub fn width(&self) -> usize {
        self.width
    }
}

fn check_probabilities(probabilities: [f64; 2]) -> Result<(), InferenceError> {
    let in_range = probabilities
        .iter()
        .all(|p| p.is_finite() && *p >= -PROBABILITY_TOLERANCE && *p <= 1.0 + PROBABILITY_TOLERANCE);
    let sums_to_one = (probabilities[0] + probabilities[1] - 1.0).abs() <= PROBABILITY_TOLERANCE;
    if in_range && sums_to_one {
        Ok(())
    } else {
        Err(InferenceError::InvalidProbabilities(probabilities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ConstantClassifier;
    use crate::logistic::LogisticRegression;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn identity_scaler(width: usize) -> StandardScaler {
        StandardScaler {
            mean: vec![0.0; width],
            scale: vec![1.0; width],
        }
    }

    struct Broken;

    impl Classifier for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn n_features(&self) -> Option<usize> {
            None
        }

        fn predict_proba(&self, _row: &[f64]) -> Result<[f64; 2], InferenceError> {
            Ok([0.7, 0.7])
        }
    }

    /// Counts how often the backend is run
    struct Counting(Arc<AtomicUsize>);

    impl Classifier for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        fn n_features(&self) -> Option<usize> {
            Some(2)
        }

        fn predict_proba(&self, _row: &[f64]) -> Result<[f64; 2], InferenceError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok([0.5, 0.5])
        }
    }

    #[test]
    fn test_backend_runs_once_per_prediction() {
        let runs = Arc::new(AtomicUsize::new(0));
        let engine = InferenceEngine::new(identity_scaler(2), Box::new(Counting(runs.clone())), 2).unwrap();

        let result = engine.predict(&FeatureVector::zeros(2)).unwrap();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        // Even split goes to class 0
        assert_eq!(result.label, 0);
    }

    #[test]
    fn test_mock_prediction() {
        let engine =
            InferenceEngine::new(identity_scaler(3), Box::new(ConstantClassifier::new(0.75)), 3).unwrap();
        let result = engine
            .predict(&FeatureVector {
                values: vec![1.0, 2.0, 3.0],
            })
            .unwrap();
        assert_eq!(result.label, 1);
        assert_eq!(result.probabilities, [0.25, 0.75]);
        assert_eq!(result.label_probability(), 0.75);
    }

    #[test]
    fn test_scaling_applied_before_classifier() {
        let scaler = StandardScaler {
            mean: vec![10.0],
            scale: vec![2.0],
        };
        let model = LogisticRegression {
            coefficients: vec![1.0],
            intercept: 0.0,
        };
        let engine = InferenceEngine::new(scaler, Box::new(model), 1).unwrap();

        // (10 - 10) / 2 = 0 -> p = 0.5 -> tie goes to 0
        let at_mean = engine.predict(&FeatureVector { values: vec![10.0] }).unwrap();
        assert_eq!(at_mean.label, 0);
        assert!((at_mean.probabilities[1] - 0.5).abs() < 1e-12);

        let above = engine.predict(&FeatureVector { values: vec![14.0] }).unwrap();
        assert_eq!(above.label, 1);
    }

    #[test]
    fn test_width_checks_at_construction() {
        let model = LogisticRegression {
            coefficients: vec![1.0, 1.0],
            intercept: 0.0,
        };
        assert!(matches!(
            InferenceEngine::new(identity_scaler(3), Box::new(model), 3),
            Err(InferenceError::InvalidInputShape { expected: 3, actual: 2 })
        ));
        assert!(InferenceEngine::new(identity_scaler(2), Box::new(ConstantClassifier::new(0.5)), 3).is_err());
    }

    #[test]
    fn test_row_width_checked() {
        let engine =
            InferenceEngine::new(identity_scaler(3), Box::new(ConstantClassifier::new(0.5)), 3).unwrap();
        assert!(engine.predict(&FeatureVector::zeros(4)).is_err());
    }

    #[test]
    fn test_invalid_probabilities_rejected() {
        let engine = InferenceEngine::new(identity_scaler(1), Box::new(Broken), 1).unwrap();
        assert!(matches!(
            engine.predict(&FeatureVector::zeros(1)),
            Err(InferenceError::InvalidProbabilities(_))
        ));
    }
}
