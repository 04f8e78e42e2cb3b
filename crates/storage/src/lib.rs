//! Storage Layer
//!
//! Read-side access to per-scan tumor measurements. The monitoring core only
//! depends on the [`MeasurementStore`] trait; [`Repository`] is the in-memory
//! implementation used by the server and tests.

mod repository;
mod seed;

pub use repository::{Measurement, Repository};
pub use seed::{PatientSeed, SeedDocument};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Record not found")]
    NotFound,
    #[error("Scan {0} already has a measurement")]
    DuplicateScan(String),
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::SerializationError(err.to_string())
    }
}

/// Source of completed measurements, owned by the imaging side of the system.
pub trait MeasurementStore: Send + Sync {
    /// Whether the patient identifier resolves.
    fn patient_exists(&self, patient_id: &str) -> Result<bool, StorageError>;

    /// All measurements for a patient, in insertion order.
    fn measurements_for_patient(&self, patient_id: &str) -> Result<Vec<Measurement>, StorageError>;
}
