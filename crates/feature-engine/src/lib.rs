//! Feature Engineering Engine
//!
//! Maps applicant selections to dataset category codes and assembles feature
//! vectors that line up with the column schema frozen at training time.

mod audit;
mod features;
mod mapping;
mod profile;
mod schema;

pub use audit::SchemaAudit;
pub use features::{
    BuiltFeatures, FeatureBuilder, FeatureVector, IndicatorOutcome, IndicatorStatus,
    FIXED_NUMERIC_DEFAULTS, NUMERIC_COLUMNS, UNEXPOSED_DEFAULTS,
};
pub use mapping::{encode, Attribute, CategoryMapping, CRITICAL_CREDIT_HISTORY};
pub use profile::ApplicantProfile;
pub use schema::{reference_columns, TrainingColumnSchema};

use thiserror::Error;

/// Errors during encoding and feature assembly
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    #[error("Unknown {attribute} selection: {label:?}")]
    UnknownCategory { attribute: Attribute, label: String },
    #[error("Training schema is missing numeric column(s): {}", missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },
    #[error("Training schema lists column {0:?} more than once")]
    DuplicateColumn(String),
}
