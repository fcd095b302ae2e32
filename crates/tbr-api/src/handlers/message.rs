//! Relay a private message over HTTP.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use tbr_core::types::id::UserKey;

use crate::error::{ApiError, MsgBody};
use crate::extractors::{ApiJson, AuthUser};
use crate::state::AppState;

/// Body of `POST /api/messages`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    /// Recipient identity, string or number.
    pub to_user_id: Value,
    /// Opaque payload forwarded as-is.
    #[serde(default)]
    pub message: Value,
}

/// POST /api/messages: relays from the authenticated principal
///
/// Answers `202` whether or not the recipient is online; delivery is
/// best-effort exactly as over the socket.
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiJson(req): ApiJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<MsgBody>), ApiError> {
    let to = UserKey::from_value(&req.to_user_id)?;

    let outcome = state
        .realtime
        .relay
        .relay(&principal.id, &to, req.message)
        .await;

    tracing::debug!(
        from = %principal.id,
        to = %to,
        delivered = outcome.delivered,
        "Message relayed over HTTP"
    );

    Ok((StatusCode::ACCEPTED, Json(MsgBody::new("accepted"))))
}
