//! Liveness endpoint.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::AppState;
use crate::rpc::{CallMetadata, GetServerVersionRequest};

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `"healthy"` while the process serves requests.
    pub status: &'static str,
    /// Server version.
    pub version: String,
    /// Seconds since startup.
    pub uptime_secs: u64,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let reply = state
        .api
        .get_server_version(&CallMetadata::default(), GetServerVersionRequest {})
        .await;

    let (version, uptime_secs) = reply
        .data
        .map_or_else(|| (String::new(), 0), |v| (v.version, v.uptime_secs));

    Json(HealthResponse {
        status: "healthy",
        version,
        uptime_secs,
    })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
