//! Logistic regression fitting

use crate::TrainingError;
use inference_engine::{sigmoid, LogisticRegression};
use ndarray::{Array1, Array2};
use tracing::debug;

/// Gradient descent settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticParams {
    pub epochs: usize,
    pub learning_rate: f64,
    /// Inverse L2 strength
    pub c: f64,
    /// Weight classes inversely to their frequency
    pub balanced: bool,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            epochs: 2000,
            learning_rate: 0.1,
            c: 1.0,
            balanced: true,
        }
    }
}

/// Per-row weights `n / (2 * n_class)`, or all ones
pub(crate) fn sample_weights(y: &[u8], balanced: bool) -> Result<Vec<f64>, TrainingError> {
    let positives = y.iter().filter(|&&label| label == 1).count();
    let negatives = y.len() - positives;
    if positives == 0 || negatives == 0 {
        return Err(TrainingError::SingleClass);
    }
    if !balanced {
        return Ok(vec![1.0; y.len()]);
    }
    let n = y.len() as f64;
    let w1 = n / (2.0 * positives as f64);
    let w0 = n / (2.0 * negatives as f64);
    Ok(y.iter().map(|&label| if label == 1 { w1 } else { w0 }).collect())
}

/// Batch gradient descent on the weighted, L2-penalized log loss
#[derive(Debug, Clone, Default)]
pub struct LogisticTrainer {
    params: LogisticParams,
}

impl LogisticTrainer {
    pub fn new(params: LogisticParams) -> Self {
        Self { params }
    }

    /// Fit on scaled rows `x` with labels `y`
    pub fn fit(&self, x: &Array2<f64>, y: &[u8]) -> Result<LogisticRegression, TrainingError> {
        if x.nrows() != y.len() {
            return Err(TrainingError::InvalidParameter(format!(
                "{} rows for {} labels",
                x.nrows(),
                y.len()
            )));
        }
        let n = y.len() as f64;
        let weights = Array1::from(sample_weights(y, self.params.balanced)?);
        let targets: Array1<f64> = y.iter().map(|&label| f64::from(label)).collect();

        let mut coef = Array1::<f64>::zeros(x.ncols());
        let mut intercept = 0.0;
        let penalty = 1.0 / (self.params.c * n);

        for epoch in 0..self.params.epochs {
            let p = (x.dot(&coef) + intercept).mapv(sigmoid);
            let residual = (&p - &targets) * &weights;
            let grad = x.t().dot(&residual) / n + &coef * penalty;
            coef.scaled_add(-self.params.learning_rate, &grad);
            intercept -= self.params.learning_rate * residual.sum() / n;

            if epoch % 500 == 0 {
                debug!("epoch {}: |grad|={:.6}", epoch, grad.dot(&grad).sqrt());
            }
        }

        Ok(LogisticRegression {
            coefficients: coef.to_vec(),
            intercept,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inference_engine::Classifier;
    use ndarray::array;

    #[test]
    fn test_separable_data() {
        let x = array![[-2.0, 0.1], [-1.0, -0.2], [-1.5, 0.0], [1.0, 0.1], [2.0, -0.1], [1.5, 0.2]];
        let y = [0, 0, 0, 1, 1, 1];
        let model = LogisticTrainer::default().fit(&x, &y).unwrap();

        assert!(model.coefficients[0] > 0.0);
        for (row, label) in x.rows().into_iter().zip(y) {
            assert_eq!(model.predict(row.as_slice().unwrap()).unwrap(), label);
        }
    }

    #[test]
    fn test_balanced_weights() {
        let weights = sample_weights(&[1, 1, 1, 0], true).unwrap();
        assert!((weights[0] - 4.0 / 6.0).abs() < 1e-12);
        assert!((weights[3] - 2.0).abs() < 1e-12);
        // Both classes carry equal total weight
        let total_pos: f64 = weights[..3].iter().sum();
        assert!((total_pos - weights[3]).abs() < 1e-12);
    }

    #[test]
    fn test_single_class_rejected() {
        let x = array![[1.0], [2.0]];
        assert!(matches!(
            LogisticTrainer::default().fit(&x, &[1, 1]),
            Err(TrainingError::SingleClass)
        ));
    }
}
