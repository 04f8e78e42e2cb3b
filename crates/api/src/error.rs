//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use monitor::MonitorError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors returned by route handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Monitor(#[from] MonitorError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Monitor(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::Monitor(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
