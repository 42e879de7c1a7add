//! Application configuration

use ::config::{Config, ConfigError, Environment, File};
use data_validator::ValidationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use trainer::TrainConfig;

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "credit-scoring";

/// Environment prefix; nested keys use `__`, e.g. `CREDIT_SCORING__LOGGING__LEVEL`
pub const ENV_PREFIX: &str = "CREDIT_SCORING";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding model.json, scaler.json and schema.json
    pub artifacts_dir: PathBuf,
    /// Accepted applicant input ranges
    pub bounds: ValidationConfig,
    pub logging: LoggingConfig,
    pub training: TrainConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: PathBuf::from("artifacts"),
            bounds: ValidationConfig::default(),
            logging: LoggingConfig::default(),
            training: TrainConfig::default(),
        }
    }
}

impl AppConfig {
    /// Layer defaults, `credit-scoring.toml`, an explicit file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder =
            Config::builder().add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false));
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
