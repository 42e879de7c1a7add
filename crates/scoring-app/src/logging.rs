//! Tracing subscriber setup

use crate::config::{LogFormat, LoggingConfig};
use crate::ScoringError;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber; `RUST_LOG` takes precedence over the configured level
///
/// Logs go to stderr so stdout carries only command output.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ScoringError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|err| ScoringError::Logging(err.to_string()))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|err| ScoringError::Logging(err.to_string()))
}
