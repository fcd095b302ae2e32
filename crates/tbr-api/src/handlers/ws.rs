//! WebSocket upgrade handler and per-connection task.

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::time::{Instant, interval_at};
use tracing::{error, info, warn};

use tbr_auth::Principal;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters accepted on upgrade.
#[derive(Debug, Default, Deserialize)]
pub struct WsQuery {
    /// Optional bearer token; when valid the socket is registered to its
    /// principal straight away.
    pub token: Option<String>,
}

/// GET /ws[?token={jwt}]: WebSocket upgrade
pub async fn ws_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Result<Response, ApiError> {
    let principal = match query.token.as_deref() {
        Some(token) => Some(state.gate.authorize_token(token)?),
        None => None,
    };

    let transport_limit = transport_message_limit(state.config.realtime.max_message_bytes);
    Ok(ws
        .max_message_size(transport_limit)
        .on_upgrade(move |socket| handle_ws_connection(state, principal, socket)))
}

/// Socket-level cap on one message.
///
/// Kept above the application limit so an oversized frame reaches the
/// dispatcher and is answered with an `error` event instead of a reset.
pub fn transport_message_limit(max_message_bytes: usize) -> usize {
    max_message_bytes.saturating_mul(2)
}

/// Drives one established connection until either side goes away.
async fn handle_ws_connection(state: AppState, principal: Option<Principal>, socket: WebSocket) {
    let realtime = state.realtime.clone();
    let (handle, mut outbound_rx) = realtime.connections.open();
    let endpoint = handle.id.clone();

    if let Some(principal) = principal {
        if let Err(e) = realtime
            .connections
            .register(&endpoint, principal.id.clone())
            .await
        {
            warn!(endpoint = %endpoint, error = %e, "Token registration failed");
        }
    }

    let (mut ws_tx, mut ws_rx) = socket.split();
    let heartbeat = realtime.heartbeat();
    let mut ping_timer = interval_at(Instant::now() + heartbeat.ping_interval, heartbeat.ping_interval);
    let mut shutdown = realtime.shutdown_receiver();

    loop {
        tokio::select! {
            inbound = ws_rx.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    realtime.dispatcher.handle_frame(&endpoint, text.as_str()).await;
                }
                Some(Ok(Message::Pong(_))) => handle.record_pong().await,
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(endpoint = %endpoint, error = %e, "WebSocket error");
                    break;
                }
            },
            outbound = outbound_rx.recv() => {
                let Some(event) = outbound else { break };
                let text = match serde_json::to_string(&event) {
                    Ok(text) => text,
                    Err(e) => {
                        error!(endpoint = %endpoint, error = %e, "Failed to encode outbound event");
                        continue;
                    }
                };
                if ws_tx.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            },
            _ = ping_timer.tick() => {
                if heartbeat.is_expired(handle.last_pong().await, Utc::now()) {
                    info!(endpoint = %endpoint, "Heartbeat timed out");
                    break;
                }
                if ws_tx.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            },
            _ = shutdown.recv() => {
                let _ = ws_tx.send(Message::Close(None)).await;
                break;
            },
        }
    }

    // Always deregister, whatever ended the loop.
    realtime.connections.close(&endpoint).await;
}
