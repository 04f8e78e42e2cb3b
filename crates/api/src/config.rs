//! Server configuration
//!
//! Layered as built-in defaults, then an optional file, then environment
//! variables prefixed with `TUMOR_MONITOR` (nested keys joined by `__`, e.g.
//! `TUMOR_MONITOR__SERVER__BIND_ADDR`). List values are comma separated.

use growth_classifier::ClassifierConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "TUMOR_MONITOR";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Failed to read configuration: {0}")]
    Source(#[from] ::config::ConfigError),
    #[error("Invalid classifier configuration: {0}")]
    Classifier(#[from] growth_classifier::ConfigError),
    #[error("Invalid log level: {0}")]
    LogLevel(String),
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Origins allowed to call the API from a browser
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Maximum level: trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LoggingConfig {
    pub fn max_level(&self) -> Result<Level, ConfigLoadError> {
        self.level
            .parse()
            .map_err(|_| ConfigLoadError::LogLevel(self.level.clone()))
    }
}

/// Optional measurement seed for the in-memory store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub path: Option<String>,
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub classifier: ClassifierConfig,
    pub seed: SeedConfig,
}

impl AppConfig {
    /// Load configuration from an optional file plus environment overrides
    pub fn load(path: Option<&str>) -> Result<Self, ConfigLoadError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::with_name(path));
        }
        let settings = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins"),
            )
            .build()?;

        let app: AppConfig = settings.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    /// Check values that deserialize fine but cannot be used
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        self.classifier.validate()?;
        self.logging.max_level()?;
        Ok(())
    }
}
