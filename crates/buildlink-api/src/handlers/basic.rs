//! Health checks.

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::json;

use super::ServerState;

/// Detailed health response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub version: &'static str,
    pub uptime: u64,
    /// Whether the BMS sensor list is cached
    pub metadata_cached: bool,
}

/// Basic health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "buildlink",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Health check with uptime and cache state.
pub async fn health_status_handler(State(state): State<ServerState>) -> Json<HealthStatus> {
    let uptime = chrono::Utc::now().timestamp() - state.started_at;

    Json(HealthStatus {
        status: "healthy".to_string(),
        service: "buildlink".to_string(),
        version: env!("CARGO_PKG_VERSION"),
        uptime: uptime.max(0) as u64,
        metadata_cached: state.bms.cache.is_populated(),
    })
}
