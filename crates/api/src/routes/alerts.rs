//! Alert Routes

use alerting::{Alert, AlertCandidate};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiError, AppState};

/// Query parameters for the patient alerts endpoint
#[derive(Debug, Deserialize)]
pub struct AlertQuery {
    /// Only return unresolved alerts
    #[serde(default)]
    pub active: bool,
}

/// Response for the patient alerts endpoint
#[derive(Debug, Serialize)]
pub struct AlertResponse {
    pub alerts: Vec<Alert>,
    pub count: usize,
    pub unresolved_count: usize,
}

/// Response for an alert check
#[derive(Debug, Serialize)]
pub struct CheckAlertsResponse {
    pub message: String,
    pub candidates_found: usize,
    pub new_alerts: Vec<AlertCandidate>,
    pub created_alerts: Vec<Alert>,
}

/// Get alerts for a patient, newest first
pub async fn get_patient_alerts(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
    Query(params): Query<AlertQuery>,
) -> Result<Json<AlertResponse>, ApiError> {
    let alerts = state.service.alerts(&patient_id, params.active)?;
    let unresolved_count = alerts.iter().filter(|a| !a.is_resolved).count();

    Ok(Json(AlertResponse {
        count: alerts.len(),
        unresolved_count,
        alerts,
    }))
}

/// Run growth classification for a patient and record new alerts
pub async fn check_alerts(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
) -> Result<Json<CheckAlertsResponse>, ApiError> {
    let report = state.service.check_alerts(&patient_id, Utc::now())?;

    Ok(Json(CheckAlertsResponse {
        message: report.summary(),
        candidates_found: report.candidates_found,
        new_alerts: report.candidates,
        created_alerts: report.alerts_created,
    }))
}

/// Mark an alert as resolved
pub async fn resolve_alert(
    State(state): State<Arc<AppState>>,
    Path(alert_id): Path<Uuid>,
) -> Result<Json<Alert>, ApiError> {
    Ok(Json(state.service.resolve_alert(alert_id, Utc::now())?))
}
