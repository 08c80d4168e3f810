//! Health and liveness handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// `GET /api/health` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub version: String,
    pub uptime_seconds: u64,
    pub requests: u64,
}

/// GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime().as_secs(),
        requests: state.request_count(),
    })
}

/// Liveness probe.
///
/// GET /livez
pub async fn liveness_probe() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "alive" }))
}
