//! Monitoring Service

use crate::{CheckAlertsReport, MonitorError, PatientDashboard};
use alerting::{Alert, AlertLedger, Recorded};
use chrono::{DateTime, Utc};
use growth_classifier::{ClassifierConfig, GrowthClassifier};
use metrics::counter;
use std::sync::Arc;
use storage::MeasurementStore;
use tracing::{debug, info, warn};
use trend_engine::{TrendCalculator, TrendPoint};
use uuid::Uuid;

/// Coordinates one monitoring operation per call.
///
/// Collaborators are injected at construction; the service keeps no state of
/// its own beyond them.
pub struct MonitoringService {
    store: Arc<dyn MeasurementStore>,
    trends: TrendCalculator,
    classifier: GrowthClassifier,
    ledger: Arc<AlertLedger>,
}

impl MonitoringService {
    pub fn new(
        store: Arc<dyn MeasurementStore>,
        ledger: Arc<AlertLedger>,
        config: ClassifierConfig,
    ) -> Self {
        info!("Creating monitoring service with config: {:?}", config);
        Self {
            trends: TrendCalculator::new(Arc::clone(&store)),
            store,
            classifier: GrowthClassifier::new(config),
            ledger,
        }
    }

    pub fn ledger(&self) -> &AlertLedger {
        &self.ledger
    }

    fn ensure_patient(&self, patient_id: &str) -> Result<(), MonitorError> {
        if self.store.patient_exists(patient_id)? {
            Ok(())
        } else {
            warn!("Unknown patient {}", patient_id);
            Err(MonitorError::PatientNotFound(patient_id.to_string()))
        }
    }

    /// Chronological volume series for a known patient
    pub fn trend(&self, patient_id: &str) -> Result<Vec<TrendPoint>, MonitorError> {
        self.ensure_patient(patient_id)?;
        Ok(self.trends.trend(patient_id)?)
    }

    /// Classify the patient's recent growth and record any resulting alert
    pub fn check_alerts(
        &self,
        patient_id: &str,
        now: DateTime<Utc>,
    ) -> Result<CheckAlertsReport, MonitorError> {
        self.ensure_patient(patient_id)?;
        counter!("tumor_monitor_alert_checks_total").increment(1);

        let trend = self.trends.trend(patient_id)?;
        let candidates: Vec<_> = self.classifier.classify(&trend, now).into_iter().collect();

        let mut alerts_created = Vec::new();
        for candidate in &candidates {
            match self.ledger.record(patient_id, candidate, now)? {
                Recorded::Created(alert) => {
                    counter!("tumor_monitor_alerts_created_total", "alert_type" => alert.alert_type.as_str())
                        .increment(1);
                    alerts_created.push(alert);
                }
                Recorded::Existing(alert) => {
                    counter!("tumor_monitor_alerts_deduplicated_total", "alert_type" => alert.alert_type.as_str())
                        .increment(1);
                    debug!("Candidate folded into open alert {}", alert.id);
                }
            }
        }

        let report = CheckAlertsReport {
            patient_id: patient_id.to_string(),
            candidates_found: candidates.len(),
            candidates,
            alerts_created,
        };
        info!("Alert check for patient {}: {}", patient_id, report.summary());
        Ok(report)
    }

    /// Resolve an alert by id
    pub fn resolve_alert(&self, alert_id: Uuid, now: DateTime<Utc>) -> Result<Alert, MonitorError> {
        let alert = self.ledger.resolve(alert_id, now)?;
        counter!("tumor_monitor_alerts_resolved_total").increment(1);
        Ok(alert)
    }

    /// Alerts for a known patient, newest first
    pub fn alerts(&self, patient_id: &str, active_only: bool) -> Result<Vec<Alert>, MonitorError> {
        self.ensure_patient(patient_id)?;
        let alerts = if active_only {
            self.ledger.list_active(patient_id)?
        } else {
            self.ledger.list_all(patient_id)?
        };
        Ok(alerts)
    }

    /// Latest measurement, full trend and open alerts in one view
    pub fn dashboard(&self, patient_id: &str) -> Result<PatientDashboard, MonitorError> {
        self.ensure_patient(patient_id)?;
        let trend = self.trends.trend(patient_id)?;
        let active_alerts = self.ledger.list_active(patient_id)?;

        Ok(PatientDashboard {
            patient_id: patient_id.to_string(),
            latest_measurement: trend.last().cloned(),
            trend,
            active_alerts,
        })
    }
}
