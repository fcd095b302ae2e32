//! Inbound and outbound event definitions.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use tbr_core::types::id::UserKey;

/// Events sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum InboundEvent {
    /// Bind this connection to a user identity (string or number).
    Register(Value),
    /// Send a private message to another user.
    PrivateMessage(PrivateMessageRequest),
}

/// Payload of an inbound `private_message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateMessageRequest {
    /// Recipient identity.
    pub to_user_id: Value,
    /// Sender identity as claimed by the client.
    pub from_user_id: Value,
    /// Opaque message body, passed through untouched.
    #[serde(default)]
    pub message: Value,
}

/// Events sent by the server to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum OutboundEvent {
    /// A private message relayed from another user.
    PrivateMessage(PrivateMessageDelivery),
    /// A frame from this connection was rejected.
    Error(ErrorPayload),
}

/// Payload of an outbound `private_message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateMessageDelivery {
    /// Canonical sender identity.
    pub from_user_id: UserKey,
    /// Message body.
    pub message: Value,
    /// Server time at relay.
    pub timestamp: DateTime<Utc>,
}

/// Payload of an outbound `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Machine-readable code.
    pub code: String,
    /// Human-readable description.
    pub message: String,
}

impl OutboundEvent {
    /// Builds an `error` event.
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::Error(ErrorPayload {
            code: code.to_string(),
            message: message.into(),
        })
    }
}
