//! Patient Trend and Dashboard Routes

use axum::{
    extract::{Path, State},
    Json,
};
use monitor::PatientDashboard;
use serde::Serialize;
use std::sync::Arc;
use trend_engine::TrendPoint;

use crate::{ApiError, AppState};

/// Response for the trend endpoint
#[derive(Debug, Serialize)]
pub struct TrendResponse {
    pub patient_id: String,
    pub trend_data: Vec<TrendPoint>,
}

/// Get the tumor volume trend for a patient
pub async fn get_trend(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
) -> Result<Json<TrendResponse>, ApiError> {
    let trend_data = state.service.trend(&patient_id)?;
    Ok(Json(TrendResponse {
        patient_id,
        trend_data,
    }))
}

/// Get the monitoring dashboard for a patient
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
) -> Result<Json<PatientDashboard>, ApiError> {
    Ok(Json(state.service.dashboard(&patient_id)?))
}
