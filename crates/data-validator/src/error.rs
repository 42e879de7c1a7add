//! Validation Error Types

use feature_engine::Attribute;
use thiserror::Error;

/// Errors during applicant validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Value is NaN or infinite
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),

    /// Label not offered for the attribute
    #[error("{label:?} is not a valid {attribute} option")]
    UnknownCategory { attribute: Attribute, label: String },
}
