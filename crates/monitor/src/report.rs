//! Orchestrator result records

use alerting::{Alert, AlertCandidate};
use serde::Serialize;
use trend_engine::TrendPoint;

/// Outcome of one alert check
#[derive(Debug, Clone, Serialize)]
pub struct CheckAlertsReport {
    pub patient_id: String,
    /// Candidates produced by the classifier
    pub candidates_found: usize,
    pub candidates: Vec<AlertCandidate>,
    /// Alerts newly stored by this check; deduplicated candidates are absent
    pub alerts_created: Vec<Alert>,
}

impl CheckAlertsReport {
    pub fn summary(&self) -> String {
        format!(
            "Found {} potential alerts, created {} new alerts",
            self.candidates_found,
            self.alerts_created.len()
        )
    }
}

/// Read-only view of a patient's monitoring state
#[derive(Debug, Clone, Serialize)]
pub struct PatientDashboard {
    pub patient_id: String,
    /// Most recent scan with a measurement
    pub latest_measurement: Option<TrendPoint>,
    pub trend: Vec<TrendPoint>,
    /// Unresolved alerts, newest first
    pub active_alerts: Vec<Alert>,
}
