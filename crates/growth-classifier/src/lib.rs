//! Growth Classification
//!
//! Computes a linear growth rate between the endpoints of a patient's recent
//! trend and maps it to an alert type and severity.

mod classifier;
mod config;
mod error;
mod types;

pub use classifier::{GrowthAssessment, GrowthClassifier};
pub use config::{ClassifierConfig, MAX_WINDOW_DAYS};
pub use error::ConfigError;
pub use types::{AlertCandidate, AlertType, Severity};
