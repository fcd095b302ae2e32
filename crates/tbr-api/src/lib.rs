//! # tbr-api
//!
//! HTTP API layer for TBR3 built on Axum.
//!
//! Provides the authorization middleware (bearer gate and admin gate),
//! the WebSocket upgrade for the realtime relay, health probes, and the
//! small authenticated surface built on top of the relay.

pub mod app;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
