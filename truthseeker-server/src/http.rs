//! TruthSeeker HTTP REST API
//!
//! Axum server running alongside the Unix socket IPC server on port 8787
//! (configurable). Each endpoint is a thin handler over an inner function
//! returning `(StatusCode, serde_json::Value)`, so the logic is testable
//! without axum dispatch.
//!
//! Endpoints:
//! - GET  /health : readiness from the system check
//! - GET  /version: server version and configured backends
//! - POST /check  : verify a text, URL or image submission
//! - POST /report : send user feedback on a verdict

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use truthseeker_core::extract::ImageUpload;
use truthseeker_core::ipc::{SeekerRequest, SeekerResponse};
use truthseeker_core::models::{InputType, ReportSubmission};
use truthseeker_core::{SeekerConfig, Submission};

use crate::router::{self, AppContext};

/// Shared state for all HTTP handlers
#[derive(Clone)]
pub struct HttpState {
    pub ctx: AppContext,
    pub config: SeekerConfig,
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .route("/check", post(check_handler))
        .route("/report", post(report_handler))
        .with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    ctx: AppContext,
    config: SeekerConfig,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", config.http.host, config.http.port);
    let state = Arc::new(HttpState { ctx, config });

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("TruthSeeker HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request / Response DTOs
// ============================================================================

/// Body of `POST /check`. `query` carries the text (or the URL when `url`
/// is absent).
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    pub query: Option<String>,
    #[serde(default)]
    pub input_type: InputType,
    pub url: Option<String>,
    pub title: Option<String>,
    pub image: Option<ImageUpload>,
}

impl From<CheckRequest> for Submission {
    fn from(req: CheckRequest) -> Self {
        let url = match req.input_type {
            InputType::Url => req.url.or_else(|| req.query.clone()),
            _ => req.url,
        };
        Submission {
            input_type: req.input_type,
            text: req.query,
            url,
            title: req.title,
            image: req.image,
        }
    }
}

/// Standard HTTP error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            status: "error".to_string(),
        }
    }
}

fn bad_request(msg: &str) -> (StatusCode, serde_json::Value) {
    (
        StatusCode::BAD_REQUEST,
        serde_json::to_value(ErrorResponse::new(msg)).unwrap_or_default(),
    )
}

// ============================================================================
// Inner (directly testable) business logic functions
// ============================================================================

pub async fn health_inner(ctx: &AppContext) -> (StatusCode, serde_json::Value) {
    let response = router::handle_request(SeekerRequest::Health, ctx).await;
    match response_to_http(response) {
        Ok(mut data) => {
            if let Some(obj) = data.as_object_mut() {
                obj.insert("version".to_string(), serde_json::json!(env!("CARGO_PKG_VERSION")));
            }
            (StatusCode::OK, data)
        }
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            serde_json::json!({
                "status": "unhealthy",
                "error": e,
            }),
        ),
    }
}

/// Inner version: version info plus the verification backends in use (pure, no IO).
pub fn version_inner(config: &SeekerConfig) -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "protocol": "truthseeker/1",
        "workflow_mode": config.workflow.mode.as_str(),
        "ai_model": config.ai.model,
    })
}

/// Inner check: rejects empty submissions, then runs the pipeline.
pub async fn check_inner(ctx: &AppContext, req: CheckRequest) -> (StatusCode, serde_json::Value) {
    let submission = Submission::from(req);
    if !submission.has_content() {
        return bad_request("query field is required");
    }

    let start = Instant::now();
    let response = router::handle_request(SeekerRequest::Check { submission }, ctx).await;
    let took_ms = start.elapsed().as_millis() as u64;

    match response_to_http(response) {
        Ok(mut data) => {
            if let Some(obj) = data.as_object_mut() {
                obj.insert("took_ms".to_string(), serde_json::json!(took_ms));
            }
            (StatusCode::OK, data)
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({
                "error": e,
                "status": "error",
            }),
        ),
    }
}

pub async fn report_inner(
    ctx: &AppContext,
    report: ReportSubmission,
) -> (StatusCode, serde_json::Value) {
    if report.original_claim.trim().is_empty() {
        return bad_request("originalClaim field is required");
    }

    let response = router::handle_request(SeekerRequest::Report { report }, ctx).await;
    match response_to_http(response) {
        Ok(data) => (StatusCode::OK, data),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({
                "success": false,
                "message": e,
                "status": "error",
            }),
        ),
    }
}

// ============================================================================
// Axum handler wrappers (thin: delegate to inner functions)
// ============================================================================

pub async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = health_inner(&state.ctx).await;
    (status, Json(body))
}

pub async fn version_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner(&state.config)))
}

pub async fn check_handler(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<CheckRequest>,
) -> impl IntoResponse {
    let (status, body) = check_inner(&state.ctx, req).await;
    (status, Json(body))
}

pub async fn report_handler(
    State(state): State<Arc<HttpState>>,
    Json(report): Json<ReportSubmission>,
) -> impl IntoResponse {
    let (status, body) = report_inner(&state.ctx, report).await;
    (status, Json(body))
}

// ============================================================================
// Helpers
// ============================================================================

/// Convert an IPC `SeekerResponse` into an HTTP body value, or an error string.
pub fn response_to_http(response: SeekerResponse) -> std::result::Result<serde_json::Value, String> {
    if response.status == "ok" {
        Ok(response.data.unwrap_or(serde_json::json!({})))
    } else {
        Err(response.error.unwrap_or_else(|| "unknown error".to_string()))
    }
}
