//! JSON seed loading for the in-memory repository

use crate::{Measurement, Repository, StorageError};
use serde::{Deserialize, Serialize};
use std::io::Read;
use tracing::info;

/// Measurements for one patient in a seed document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientSeed {
    pub patient_id: String,
    #[serde(default)]
    pub measurements: Vec<Measurement>,
}

/// Top-level seed document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedDocument {
    #[serde(default)]
    pub patients: Vec<PatientSeed>,
}

impl SeedDocument {
    /// Parse a seed document from JSON
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, StorageError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Repository {
    /// Register every patient in the document and insert its measurements.
    ///
    /// Stops at the first invalid or duplicate measurement; records inserted
    /// before the failure are kept.
    pub fn load_seed(&self, seed: SeedDocument) -> Result<usize, StorageError> {
        let mut inserted = 0;
        for patient in seed.patients {
            self.register_patient(&patient.patient_id)?;
            for measurement in patient.measurements {
                self.insert_measurement(&patient.patient_id, measurement)?;
                inserted += 1;
            }
        }
        info!("Seeded {} measurements", inserted);
        Ok(inserted)
    }
}
