//! Standard scaling frozen at training time

use crate::classifier::check_width;
use crate::InferenceError;
use serde::{Deserialize, Serialize};

/// Per-column zero-mean, unit-variance transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Column means of the training rows
    pub mean: Vec<f64>,
    /// Column standard deviations; constant columns use 1
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Fit on training rows using the population standard deviation
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self, InferenceError> {
        let width = rows
            .first()
            .map(Vec::len)
            .ok_or_else(|| InferenceError::InferenceFailed("cannot fit scaler on zero rows".to_string()))?;
        for row in rows {
            check_width(width, row)?;
        }

        let n = rows.len() as f64;
        let mut mean = vec![0.0; width];
        for row in rows {
            for (m, x) in mean.iter_mut().zip(row) {
                *m += x;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut variance = vec![0.0; width];
        for row in rows {
            for ((v, x), m) in variance.iter_mut().zip(row).zip(&mean) {
                *v += (x - m) * (x - m);
            }
        }
        let scale = variance
            .into_iter()
            .map(|v| {
                let std = (v / n).sqrt();
                if std < 10.0 * f64::EPSILON {
                    1.0
                } else {
                    std
                }
            })
            .collect();

        Ok(Self { mean, scale })
    }

    /// Number of columns the scaler was fitted on
    pub fn width(&self) -> usize {
        self.mean.len()
    }

    /// Check that mean and scale agree and scales are usable
    pub fn validate(&self) -> Result<(), InferenceError> {
        if self.mean.len() != self.scale.len() {
            return Err(InferenceError::ModelLoadError(format!(
                "scaler has {} means but {} scales",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if let Some(idx) = self
            .scale
            .iter()
            .position(|s| !s.is_finite() || *s <= 0.0)
        {
            return Err(InferenceError::ModelLoadError(format!(
                "scaler column {idx} has non-positive scale"
            )));
        }
        Ok(())
    }

    /// Scale a single row
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        check_width(self.width(), row)?;
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| (x - m) / s)
            .collect())
    }
}
