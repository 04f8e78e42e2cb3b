//! Tumor Monitoring API Server
//!
//! Thin REST layer over the monitoring service: trend and dashboard reads,
//! alert checks and resolution, health and Prometheus metrics.

use anyhow::Context;
use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

pub mod config;
mod error;
mod routes;

pub use crate::config::{AppConfig, ConfigLoadError, LoggingConfig, ServerConfig};
pub use error::ApiError;

use alerting::AlertLedger;
use monitor::MonitoringService;
use storage::{Repository, SeedDocument};

/// Application state shared across handlers
pub struct AppState {
    pub service: MonitoringService,
    /// Prometheus exporter handle, absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
    pub version: String,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(service: MonitoringService) -> Self {
        Self {
            service,
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime_seconds: u64,
    pub alerts: AlertTotals,
}

/// Ledger totals reported by the health check
#[derive(Debug, Serialize)]
pub struct AlertTotals {
    pub total: usize,
    pub unresolved: usize,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route(
            "/api/v1/monitor/patient/:patient_id/dashboard",
            get(routes::patients::get_dashboard),
        )
        .route(
            "/api/v1/monitor/patient/:patient_id/trend",
            get(routes::patients::get_trend),
        )
        .route(
            "/api/v1/monitor/patient/:patient_id/alerts",
            get(routes::alerts::get_patient_alerts),
        )
        .route(
            "/api/v1/monitor/patient/:patient_id/check-alerts",
            post(routes::alerts::check_alerts),
        )
        .route(
            "/api/v1/monitor/alerts/:alert_id/resolve",
            put(routes::alerts::resolve_alert),
        )
        .route("/metrics", get(metrics_handler))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let ledger = state.service.ledger();

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        alerts: AlertTotals {
            total: ledger.len(),
            unresolved: ledger.unresolved_count(),
        },
    })
}

/// Prometheus text exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Browser access for the configured origins
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let builder = FmtSubscriber::builder()
        .with_max_level(config.max_level()?)
        .with_target(true);

    let result = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.context("Failed to set tracing subscriber")
}

/// Install the global Prometheus recorder
pub fn install_metrics() -> anyhow::Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")
}

/// Wire the store, ledger and service described by the configuration
pub fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let repository = Arc::new(Repository::new());

    if let Some(path) = &config.seed.path {
        let file = File::open(path).with_context(|| format!("Failed to open seed file {path}"))?;
        let seed = SeedDocument::from_reader(BufReader::new(file))?;
        repository.load_seed(seed)?;
    }

    let service = MonitoringService::new(
        repository,
        Arc::new(AlertLedger::new()),
        config.classifier.clone(),
    );
    Ok(AppState::new(service))
}

/// Run the server
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let handle = install_metrics()?;
    let state = Arc::new(build_state(&config)?.with_metrics(handle));
    let app = create_router(state).layer(cors_layer(&config.server));

    info!("Starting API server on {}", config.server.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use chrono::Duration;
    use growth_classifier::ClassifierConfig;
    use serde_json::Value;
    use storage::Measurement;
    use tower::ServiceExt;

    fn measurement(scan_id: &str, scan_date: DateTime<Utc>, volume_cc: f64) -> Measurement {
        Measurement {
            scan_id: scan_id.to_string(),
            scan_date,
            tumor_volume_cc: volume_cc,
            tumor_volume_mm3: volume_cc * 1000.0,
            confidence_score: 0.91,
            scan_type: "T1".to_string(),
        }
    }

    /// P001 grows 100 cc -> 115 cc over 30 days; P002 has no scans
    fn test_app() -> Router {
        let repo = Arc::new(Repository::new());
        repo.register_patient("P001").unwrap();
        repo.register_patient("P002").unwrap();
        let start = Utc::now() - Duration::days(40);
        repo.insert_measurement("P001", measurement("s2", start + Duration::days(30), 115.0))
            .unwrap();
        repo.insert_measurement("P001", measurement("s1", start, 100.0)).unwrap();

        let service = MonitoringService::new(
            repo,
            Arc::new(AlertLedger::new()),
            ClassifierConfig::default(),
        );
        let handle = PrometheusBuilder::new().build_recorder().handle();
        create_router(Arc::new(AppState::new(service).with_metrics(handle)))
    }

    async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let (status, body) = send(&app, Method::GET, "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["alerts"]["total"], 0);
    }

    #[tokio::test]
    async fn test_trend() {
        let app = test_app();
        let (status, body) = send(&app, Method::GET, "/api/v1/monitor/patient/P001/trend").await;
        assert_eq!(status, StatusCode::OK);
        let trend = body["trend_data"].as_array().unwrap();
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0]["scan_id"], "s1");
        assert_eq!(trend[1]["tumor_volume_cc"], 115.0);

        let (status, body) = send(&app, Method::GET, "/api/v1/monitor/patient/P002/trend").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["trend_data"].as_array().unwrap().is_empty());

        let (status, body) = send(&app, Method::GET, "/api/v1/monitor/patient/P404/trend").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Patient with ID P404 not found");
    }

    #[tokio::test]
    async fn test_check_alerts_deduplicates() {
        let app = test_app();
        let uri = "/api/v1/monitor/patient/P001/check-alerts";

        let (status, body) = send(&app, Method::POST, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Found 1 potential alerts, created 1 new alerts");
        assert_eq!(body["created_alerts"][0]["alert_type"], "rapid_growth");
        assert_eq!(body["created_alerts"][0]["severity"], "high");
        assert_eq!(
            body["new_alerts"][0]["message"],
            "Rapid tumor growth detected: 15.00 cc/month"
        );

        let (_, body) = send(&app, Method::POST, uri).await;
        assert_eq!(body["message"], "Found 1 potential alerts, created 0 new alerts");

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/v1/monitor/patient/P001/alerts?active=true",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["unresolved_count"], 1);
    }

    #[tokio::test]
    async fn test_resolve_alert() {
        let app = test_app();
        let (_, body) = send(&app, Method::POST, "/api/v1/monitor/patient/P001/check-alerts").await;
        let id = body["created_alerts"][0]["id"].as_str().unwrap().to_string();
        let uri = format!("/api/v1/monitor/alerts/{id}/resolve");

        let (status, first) = send(&app, Method::PUT, &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["is_resolved"], true);
        assert!(first["resolved_at"].is_string());

        let (status, second) = send(&app, Method::PUT, &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["resolved_at"], first["resolved_at"]);

        let (_, body) = send(&app, Method::GET, "/api/v1/monitor/patient/P001/alerts").await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["unresolved_count"], 0);
    }

    #[tokio::test]
    async fn test_resolve_unknown_or_malformed_id() {
        let app = test_app();
        let unknown = format!("/api/v1/monitor/alerts/{}/resolve", uuid::Uuid::new_v4());
        let (status, _) = send(&app, Method::PUT, &unknown).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::PUT, "/api/v1/monitor/alerts/not-a-uuid/resolve").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_dashboard() {
        let app = test_app();
        send(&app, Method::POST, "/api/v1/monitor/patient/P001/check-alerts").await;

        let (status, body) = send(&app, Method::GET, "/api/v1/monitor/patient/P001/dashboard").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["patient_id"], "P001");
        assert_eq!(body["latest_measurement"]["scan_id"], "s2");
        assert_eq!(body["trend"].as_array().unwrap().len(), 2);
        assert_eq!(body["active_alerts"].as_array().unwrap().len(), 1);

        let (status, body) = send(&app, Method::GET, "/api/v1/monitor/patient/P002/dashboard").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["latest_measurement"].is_null());
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let app = test_app();
        let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origins() {
        let server = ServerConfig {
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://bad\norigin".to_string(),
            ],
            ..Default::default()
        };
        let app = test_app().layer(cors_layer(&server));

        let allowed = |origin: &'static str| {
            let app = app.clone();
            async move {
                let request = Request::builder()
                    .uri("/api/v1/health")
                    .header(header::ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap();
                let response = app.oneshot(request).await.unwrap();
                assert_eq!(response.status(), StatusCode::OK);
                response
                    .headers()
                    .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                    .cloned()
            }
        };

        assert_eq!(
            allowed("http://localhost:5173").await.unwrap(),
            "http://localhost:5173"
        );
        assert!(allowed("https://elsewhere.example").await.is_none());
    }

    #[test]
    fn test_build_state_without_seed() {
        let state = build_state(&AppConfig::default()).unwrap();
        assert!(state.metrics.is_none());
        assert!(state.service.ledger().is_empty());
    }
}
