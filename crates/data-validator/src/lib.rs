//! Applicant Input Validation
//!
//! Rejects out-of-range numeric input and unknown category labels before an
//! application reaches the scoring pipeline.

mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{ValidationConfig, ValidationResult, Validator};
