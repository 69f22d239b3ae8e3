//! Health check handler

use axum::{Json, extract::State, http::header, response::IntoResponse};
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health check response body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub environment: String,
    pub version: &'static str,
}

/// Liveness probe, served on `/health` and `/api/health`
///
/// Always 200 while the process is up; the body carries the environment
/// and build version for deployment checks.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "no-cache")],
        Json(HealthResponse {
            status: "healthy",
            timestamp: Utc::now().to_rfc3339(),
            environment: state.environment.to_string(),
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}
