//! Alerting System
//!
//! Persists growth alerts, enforces a single unresolved alert per patient and
//! alert type, and tracks resolution.

mod ledger;

pub use growth_classifier::{AlertCandidate, AlertType, Severity};
pub use ledger::{Alert, AlertLedger, Recorded};

use thiserror::Error;
use uuid::Uuid;

/// Ledger errors
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Alert {0} not found")]
    NotFound(Uuid),
    #[error("Ledger storage failure: {0}")]
    StorageFailure(String),
}
