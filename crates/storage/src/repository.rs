//! Repository Implementation

use crate::{MeasurementStore, StorageError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// Segmentation result for a single scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub scan_id: String,
    pub scan_date: DateTime<Utc>,
    pub tumor_volume_cc: f64,
    pub tumor_volume_mm3: f64,
    pub confidence_score: f64,
    /// Acquisition sequence (T1, T2, FLAIR, ...)
    pub scan_type: String,
}

impl Measurement {
    /// Check volumes are non-negative and confidence lies in [0, 1]
    pub fn validate(&self) -> Result<(), StorageError> {
        check_range("tumor_volume_cc", self.tumor_volume_cc, 0.0, f64::MAX)?;
        check_range("tumor_volume_mm3", self.tumor_volume_mm3, 0.0, f64::MAX)?;
        check_range("confidence_score", self.confidence_score, 0.0, 1.0)
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), StorageError> {
    // NaN falls outside every range
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(StorageError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

#[derive(Default)]
struct Inner {
    /// Measurements per patient, in insertion order
    patients: HashMap<String, Vec<Measurement>>,
    /// Scans that already carry a measurement
    scan_ids: HashSet<String>,
}

/// In-memory measurement repository
pub struct Repository {
    inner: Mutex<Inner>,
}

impl Repository {
    /// Create an empty repository
    pub fn new() -> Self {
        info!("Creating in-memory measurement repository");
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StorageError> {
        self.inner
            .lock()
            .map_err(|e| StorageError::DatabaseError(format!("Lock error: {}", e)))
    }

    /// Register a patient with no measurements. Registering twice is a no-op.
    pub fn register_patient(&self, patient_id: &str) -> Result<(), StorageError> {
        let mut inner = self.lock()?;
        inner.patients.entry(patient_id.to_string()).or_default();
        Ok(())
    }

    /// Append a measurement for a registered patient
    pub fn insert_measurement(
        &self,
        patient_id: &str,
        measurement: Measurement,
    ) -> Result<(), StorageError> {
        measurement.validate()?;

        let mut inner = self.lock()?;
        if inner.scan_ids.contains(&measurement.scan_id) {
            return Err(StorageError::DuplicateScan(measurement.scan_id));
        }

        let Inner { patients, scan_ids } = &mut *inner;
        let series = patients.get_mut(patient_id).ok_or(StorageError::NotFound)?;
        scan_ids.insert(measurement.scan_id.clone());
        debug!(
            "Stored measurement for scan {} (patient {})",
            measurement.scan_id, patient_id
        );
        series.push(measurement);
        Ok(())
    }

    /// Number of known patients
    pub fn patient_count(&self) -> usize {
        self.inner.lock().map(|i| i.patients.len()).unwrap_or(0)
    }

    /// Total number of stored measurements
    pub fn measurement_count(&self) -> usize {
        self.inner.lock().map(|i| i.scan_ids.len()).unwrap_or(0)
    }
}

impl MeasurementStore for Repository {
    fn patient_exists(&self, patient_id: &str) -> Result<bool, StorageError> {
        Ok(self.lock()?.patients.contains_key(patient_id))
    }

    fn measurements_for_patient(&self, patient_id: &str) -> Result<Vec<Measurement>, StorageError> {
        Ok(self
            .lock()?
            .patients
            .get(patient_id)
            .cloned()
            .unwrap_or_default())
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}
