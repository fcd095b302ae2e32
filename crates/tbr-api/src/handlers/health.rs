//! Health check handlers.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use tbr_realtime::metrics::MetricsSnapshot;

use crate::state::AppState;

/// Basic health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the process answers.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since startup.
    pub uptime_seconds: u64,
}

/// Health plus realtime engine state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    #[serde(flatten)]
    pub health: HealthResponse,
    /// Open WebSocket connections.
    pub ws_connections: usize,
    /// Users with at least one registered endpoint.
    pub online_users: usize,
    /// Engine counters.
    pub metrics: MetricsSnapshot,
}

fn basic(state: &AppState) -> HealthResponse {
    HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(basic(&state))
}

/// GET /api/health/detailed
pub async fn health_detailed(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    let connections = &state.realtime.connections;

    Json(DetailedHealthResponse {
        health: basic(&state),
        ws_connections: connections.connection_count(),
        online_users: connections.user_count().await,
        metrics: state.realtime.metrics.snapshot(),
    })
}
