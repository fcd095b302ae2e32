//! Route definitions.

use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};

use crate::handlers::{admin, auth, health, message, ws};
use crate::middleware::auth::{require_admin, require_auth};
use crate::middleware::logging::request_logging;
use crate::state::AppState;

/// Builds the complete API router with all routes.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(public_routes())
        .merge(authenticated_routes(state.clone()))
        .merge(admin_routes(state.clone()));

    Router::new()
        .nest("/api", api)
        .route("/ws", get(ws::ws_handler))
        .layer(from_fn(request_logging))
        .with_state(state)
}

/// Health probes, open to anyone.
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/detailed", get(health::health_detailed))
}

/// Routes behind the bearer gate.
fn authenticated_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(auth::me))
        .route("/messages", post(message::send_message))
        .route_layer(from_fn_with_state(state, require_auth))
}

/// Routes behind the bearer gate and the admin gate.
fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/presence", get(admin::presence::list_online))
        .route("/admin/presence/{user_id}", get(admin::presence::user_presence))
        // Last layer runs first: authenticate, then check the admin flag.
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state, require_auth))
}
