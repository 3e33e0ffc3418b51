//! Health check endpoints for container orchestrators

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::warn;

use crate::api::types::{ApiError, Json};

use super::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Readiness: 200 while the store answers a ping, 503 otherwise
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    if let Err(err) = state.storage.ping().await {
        warn!(error = %err, "Health check failed to reach the store");
        return Err(ApiError::unavailable("Database not available!"));
    }

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}

/// Liveness check - the process is up and serving
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}
