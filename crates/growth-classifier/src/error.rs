//! Classifier Error Types

use thiserror::Error;

/// Invalid classifier configuration
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Parameter must be a finite value inside the given bound
    #[error("{field} value {value} must be {requirement}")]
    InvalidParameter {
        field: &'static str,
        value: f64,
        requirement: &'static str,
    },
}
