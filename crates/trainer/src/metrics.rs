//! Test-split evaluation

use crate::TrainingError;
use serde::Serialize;
use std::fmt;

/// Confusion-matrix metrics with class 1 (creditworthy) as positive
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvaluationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl EvaluationMetrics {
    /// Compare predicted labels with the ground truth
    pub fn compute(predictions: &[u8], labels: &[u8]) -> Result<Self, TrainingError> {
        if predictions.len() != labels.len() {
            return Err(TrainingError::InvalidParameter(format!(
                "{} predictions for {} labels",
                predictions.len(),
                labels.len()
            )));
        }

        let (mut tp, mut fp, mut tn, mut fn_) = (0, 0, 0, 0);
        for (&predicted, &actual) in predictions.iter().zip(labels) {
            match (predicted == 1, actual == 1) {
                (true, true) => tp += 1,
                (true, false) => fp += 1,
                (false, false) => tn += 1,
                (false, true) => fn_ += 1,
            }
        }

        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Ok(Self {
            accuracy: ratio(tp + tn, predictions.len()),
            precision,
            recall,
            f1,
            true_positives: tp,
            false_positives: fp,
            true_negatives: tn,
            false_negatives: fn_,
        })
    }
}

impl fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "accuracy={:.4} precision={:.4} recall={:.4} f1={:.4} (tp={} fp={} tn={} fn={})",
            self.accuracy,
            self.precision,
            self.recall,
            self.f1,
            self.true_positives,
            self.false_positives,
            self.true_negatives,
            self.false_negatives,
        )
    }
}
