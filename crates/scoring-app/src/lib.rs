//! Loan Eligibility Scoring
//!
//! Wires the feature builder, scaler/classifier adapter and decision policy
//! into a single process-scoped pipeline, plus the configuration, logging and
//! reporting used by the `credit-scoring` binary.

mod config;
mod logging;
mod report;
mod scorer;

pub use config::{AppConfig, LogFormat, LoggingConfig, DEFAULT_CONFIG_FILE, ENV_PREFIX};
pub use logging::init_logging;
pub use report::{audit_report, options_report};
pub use scorer::{Assessment, CreditScorer};

use data_validator::ValidationError;
use thiserror::Error;

/// Errors surfaced by the scoring application
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error("Logging setup failed: {0}")]
    Logging(String),
    #[error("Invalid applicant profile: {}", join_errors(.0))]
    InvalidProfile(Vec<ValidationError>),
    #[error("Profile could not be parsed: {0}")]
    ProfileFormat(#[from] serde_json::Error),
    #[error(transparent)]
    Feature(#[from] feature_engine::FeatureError),
    #[error(transparent)]
    Inference(#[from] inference_engine::InferenceError),
    #[error(transparent)]
    Storage(#[from] storage::StorageError),
    #[error(transparent)]
    Training(#[from] trainer::TrainingError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
