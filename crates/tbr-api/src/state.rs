//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use tbr_auth::AuthGate;
use tbr_core::config::AppConfig;
use tbr_realtime::RealtimeEngine;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Bearer-token authorization gate
    pub gate: Arc<AuthGate>,
    /// WebSocket realtime engine
    pub realtime: Arc<RealtimeEngine>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Builds state with a fresh, empty realtime engine.
    pub fn new(config: AppConfig) -> Self {
        let gate = Arc::new(AuthGate::new(&config.auth));
        let realtime = Arc::new(RealtimeEngine::new(config.realtime.clone()));
        Self {
            config: Arc::new(config),
            gate,
            realtime,
            started_at: Instant::now(),
        }
    }
}
