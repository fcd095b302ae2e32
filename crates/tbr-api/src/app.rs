//! Application builder and server runner.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use tbr_core::config::AppConfig;
use tbr_core::error::{AppError, ErrorKind};
use tbr_realtime::RealtimeEngine;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the Axum application with all middleware layers.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);

    build_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Binds the configured address and serves until a shutdown signal.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    let state = AppState::new(config);
    let addr = state.config.server.bind_address();

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e))?;

    info!(address = %addr, "TBR3 server listening");

    let realtime = state.realtime.clone();
    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown_signal(realtime))
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM, then closes every WebSocket.
async fn shutdown_signal(realtime: Arc<RealtimeEngine>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }

    realtime.shutdown().await;
}
