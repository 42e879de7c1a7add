//! ONNX classifier run through tract
//!
//! Expects a graph with one `f32[1, n]` input and a `f32[1, 2]` probability
//! output, which is what skl2onnx emits for binary classifiers exported with
//! `zipmap=False` (output 0 is the label, output 1 the probabilities).

use crate::classifier::{check_width, Classifier};
use crate::InferenceError;
use std::path::Path;
use tracing::info;
use tract_onnx::prelude::*;

type OnnxPlan = TypedRunnableModel<TypedModel>;

/// ONNX graph loaded and optimized once at startup
pub struct OnnxClassifier {
    plan: OnnxPlan,
    n_features: usize,
    probabilities_output: usize,
}

impl OnnxClassifier {
    /// Load and optimize a model for a fixed input width
    pub fn load(
        path: &Path,
        n_features: usize,
        probabilities_output: usize,
    ) -> Result<Self, InferenceError> {
        info!("Loading ONNX classifier from {}", path.display());

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, n_features]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| InferenceError::ModelLoadError(format!("{}: {e}", path.display())))?;

        Ok(Self {
            plan,
            n_features,
            probabilities_output,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        "onnx"
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], InferenceError> {
        check_width(self.n_features, row)?;

        let data: Vec<f32> = row.iter().map(|v| *v as f32).collect();
        let input = Tensor::from_shape(&[1, self.n_features], &data)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let probabilities = outputs.get(self.probabilities_output).ok_or_else(|| {
            InferenceError::InferenceFailed(format!(
                "model has {} outputs, probabilities expected at {}",
                outputs.len(),
                self.probabilities_output
            ))
        })?;
        let values: Vec<f32> = probabilities
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?
            .iter()
            .copied()
            .collect();

        match values.as_slice() {
            [p0, p1] => Ok([f64::from(*p0), f64::from(*p1)]),
            other => Err(InferenceError::InferenceFailed(format!(
                "expected 2 class probabilities, got {}",
                other.len()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two inputs, `softmax(x · [[1, -1], [0, 0]])`; outputs are label then probabilities
    fn fixture_path() -> &'static Path {
        Path::new(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/data/two_class_softmax.onnx"
        ))
    }

    #[test]
    fn test_predict_proba_runs_graph() {
        let classifier = OnnxClassifier::load(fixture_path(), 2, 1).unwrap();
        assert_eq!(classifier.n_features(), Some(2));

        let [p0, p1] = classifier.predict_proba(&[2.0, 0.0]).unwrap();
        let expected = 1.0 / (1.0 + (-4.0f64).exp());
        assert!((p0 - expected).abs() < 1e-5, "p0 = {p0}");
        assert!((p0 + p1 - 1.0).abs() < 1e-5);

        assert_eq!(classifier.predict(&[2.0, 0.0]).unwrap(), 0);
        assert_eq!(classifier.predict(&[-2.0, 0.7]).unwrap(), 1);
    }

    #[test]
    fn test_even_logits_split_evenly() {
        let classifier = OnnxClassifier::load(fixture_path(), 2, 1).unwrap();
        let [p0, p1] = classifier.predict_proba(&[0.0, 5.0]).unwrap();
        assert!((p0 - 0.5).abs() < 1e-6);
        assert!((p1 - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_label_output_is_not_probabilities() {
        let classifier = OnnxClassifier::load(fixture_path(), 2, 0).unwrap();
        assert!(matches!(
            classifier.predict_proba(&[1.0, 0.0]),
            Err(InferenceError::InferenceFailed(_))
        ));
    }

    #[test]
    fn test_output_index_out_of_range() {
        let classifier = OnnxClassifier::load(fixture_path(), 2, 5).unwrap();
        let err = classifier.predict_proba(&[1.0, 0.0]).unwrap_err();
        assert!(err.to_string().contains("model has 2 outputs"));
    }

    #[test]
    fn test_wrong_width_rejected_before_run() {
        let classifier = OnnxClassifier::load(fixture_path(), 2, 1).unwrap();
        assert!(matches!(
            classifier.predict_proba(&[1.0, 0.0, 3.0]),
            Err(InferenceError::InvalidInputShape { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = OnnxClassifier::load(Path::new("/nonexistent/model.onnx"), 4, 1)
            .err()
            .unwrap();
        assert!(matches!(err, InferenceError::ModelLoadError(_)));
    }
}
