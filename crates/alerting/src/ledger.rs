//! Alert Ledger Implementation

use crate::{AlertCandidate, AlertType, LedgerError, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

/// Persisted alert record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub patient_id: String,
    pub alert_type: AlertType,
    pub severity: Severity,
    pub message: String,
    pub is_resolved: bool,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Result of recording a candidate
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    /// A new unresolved alert was stored
    Created(Alert),
    /// An unresolved alert of the same type already existed and is returned unchanged
    Existing(Alert),
}

impl Recorded {
    pub fn alert(&self) -> &Alert {
        match self {
            Recorded::Created(alert) | Recorded::Existing(alert) => alert,
        }
    }

    pub fn into_alert(self) -> Alert {
        match self {
            Recorded::Created(alert) | Recorded::Existing(alert) => alert,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Recorded::Created(_))
    }
}

#[derive(Default)]
struct LedgerState {
    /// All alerts in insertion order
    alerts: Vec<Alert>,
    /// Alert id to position in `alerts`
    index: HashMap<Uuid, usize>,
    /// The single unresolved alert per (patient, type)
    unresolved: HashMap<(String, AlertType), Uuid>,
}

/// In-memory alert ledger.
///
/// Every operation runs under one lock, so the duplicate check in
/// [`AlertLedger::record`] and the insert that follows it are atomic.
pub struct AlertLedger {
    state: Mutex<LedgerState>,
}

impl AlertLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        info!("Creating alert ledger");
        Self {
            state: Mutex::new(LedgerState::default()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, LedgerState>, LedgerError> {
        self.state
            .lock()
            .map_err(|e| LedgerError::StorageFailure(format!("Lock error: {}", e)))
    }

    /// Store a candidate unless the patient already has an unresolved alert of its type
    pub fn record(
        &self,
        patient_id: &str,
        candidate: &AlertCandidate,
        now: DateTime<Utc>,
    ) -> Result<Recorded, LedgerError> {
        let mut state = self.lock()?;
        let key = (patient_id.to_string(), candidate.alert_type);

        if let Some(existing) = state.unresolved.get(&key).copied() {
            let alert = state.alerts[state.index[&existing]].clone();
            debug!(
                "Alert suppressed: {} already open for patient {} ({})",
                candidate.alert_type, patient_id, alert.id
            );
            return Ok(Recorded::Existing(alert));
        }

        let alert = Alert {
            id: Uuid::new_v4(),
            patient_id: patient_id.to_string(),
            alert_type: candidate.alert_type,
            severity: candidate.severity,
            message: candidate.message.clone(),
            is_resolved: false,
            created_at: now,
            resolved_at: None,
        };

        let position = state.alerts.len();
        state.index.insert(alert.id, position);
        state.unresolved.insert(key, alert.id);
        state.alerts.push(alert.clone());

        info!(
            "Alert recorded: {} [{}] for patient {} ({})",
            alert.alert_type, alert.severity, patient_id, alert.id
        );
        Ok(Recorded::Created(alert))
    }

    /// Mark an alert resolved. Resolving twice keeps the first resolution time.
    pub fn resolve(&self, alert_id: Uuid, now: DateTime<Utc>) -> Result<Alert, LedgerError> {
        let mut state = self.lock()?;
        let position = *state
            .index
            .get(&alert_id)
            .ok_or(LedgerError::NotFound(alert_id))?;

        if state.alerts[position].is_resolved {
            debug!("Alert {} already resolved", alert_id);
            return Ok(state.alerts[position].clone());
        }

        let alert = &mut state.alerts[position];
        alert.is_resolved = true;
        alert.resolved_at = Some(now);
        let resolved = alert.clone();
        state
            .unresolved
            .remove(&(resolved.patient_id.clone(), resolved.alert_type));

        info!("Alert resolved: {} for patient {}", alert_id, resolved.patient_id);
        Ok(resolved)
    }

    /// Look up a single alert
    pub fn get(&self, alert_id: Uuid) -> Result<Alert, LedgerError> {
        let state = self.lock()?;
        state
            .index
            .get(&alert_id)
            .map(|&position| state.alerts[position].clone())
            .ok_or(LedgerError::NotFound(alert_id))
    }

    /// Unresolved alerts for a patient, newest first
    pub fn list_active(&self, patient_id: &str) -> Result<Vec<Alert>, LedgerError> {
        self.list(patient_id, true)
    }

    /// Every alert for a patient, newest first
    pub fn list_all(&self, patient_id: &str) -> Result<Vec<Alert>, LedgerError> {
        self.list(patient_id, false)
    }

    fn list(&self, patient_id: &str, active_only: bool) -> Result<Vec<Alert>, LedgerError> {
        let state = self.lock()?;
        let mut alerts: Vec<Alert> = state
            .alerts
            .iter()
            .rev()
            .filter(|a| a.patient_id == patient_id && !(active_only && a.is_resolved))
            .cloned()
            .collect();
        // Stable: alerts sharing a timestamp stay most-recently-inserted first
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(alerts)
    }

    /// Total number of alerts ever recorded
    pub fn len(&self) -> usize {
        self.state.lock().map(|s| s.alerts.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of alerts awaiting resolution
    pub fn unresolved_count(&self) -> usize {
        self.state.lock().map(|s| s.unresolved.len()).unwrap_or(0)
    }
}

impl Default for AlertLedger {
    fn default() -> Self {
        Self::new()
    }
}
