//! Tumor Monitoring Orchestrator
//!
//! Ties the measurement store, trend engine, growth classifier and alert
//! ledger together behind the operations callers use: trend and dashboard
//! reads, alert checks, and alert resolution.

mod report;
mod service;

pub use report::{CheckAlertsReport, PatientDashboard};
pub use service::MonitoringService;

use alerting::LedgerError;
use storage::StorageError;
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced to callers of the monitoring service
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Patient with ID {0} not found")]
    PatientNotFound(String),

    #[error("Alert with ID {0} not found")]
    AlertNotFound(Uuid),

    #[error("Measurement store failure: {0}")]
    Storage(#[from] StorageError),

    #[error("Alert ledger failure: {0}")]
    Ledger(String),
}

impl From<LedgerError> for MonitorError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound(id) => MonitorError::AlertNotFound(id),
            LedgerError::StorageFailure(msg) => MonitorError::Ledger(msg),
        }
    }
}

impl MonitorError {
    /// Whether the error means an identifier did not resolve
    pub fn is_not_found(&self) -> bool {
        matches!(self, MonitorError::PatientNotFound(_) | MonitorError::AlertNotFound(_))
    }
}
