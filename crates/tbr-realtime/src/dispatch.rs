//! Inbound frame dispatch: routes client events to the registry and relay.

use std::sync::Arc;

use tracing::warn;

use tbr_core::error::AppError;
use tbr_core::types::id::{EndpointId, UserKey};

use crate::connection::manager::ConnectionManager;
use crate::message::types::{InboundEvent, OutboundEvent};
use crate::message::validator::validate_frame;
use crate::metrics::RealtimeMetrics;
use crate::relay::MessageRelay;

/// Parses text frames and applies them.
#[derive(Debug)]
pub struct InboundDispatcher {
    connections: Arc<ConnectionManager>,
    relay: Arc<MessageRelay>,
    metrics: Arc<RealtimeMetrics>,
    max_message_bytes: usize,
}

impl InboundDispatcher {
    /// Creates a dispatcher.
    pub fn new(
        connections: Arc<ConnectionManager>,
        relay: Arc<MessageRelay>,
        metrics: Arc<RealtimeMetrics>,
        max_message_bytes: usize,
    ) -> Self {
        Self {
            connections,
            relay,
            metrics,
            max_message_bytes,
        }
    }

    /// Handles one text frame from `endpoint`.
    ///
    /// A bad frame is answered with an `error` event to the sender only.
    pub async fn handle_frame(&self, endpoint: &EndpointId, raw: &str) {
        self.metrics.frame_received();

        if let Err(e) = self.dispatch(endpoint, raw).await {
            self.metrics.frame_rejected();
            warn!(endpoint = %endpoint, error = %e, "Rejected inbound frame");
            self.connections
                .send_to(endpoint, OutboundEvent::error(&e.kind.to_string(), e.message));
        }
    }

    async fn dispatch(&self, endpoint: &EndpointId, raw: &str) -> Result<(), AppError> {
        validate_frame(raw, self.max_message_bytes)?;

        let event: InboundEvent = serde_json::from_str(raw)
            .map_err(|e| AppError::validation(format!("Failed to parse message: {e}")))?;

        match event {
            InboundEvent::Register(raw_id) => {
                let user = UserKey::from_value(&raw_id)?;
                self.connections.register(endpoint, user).await?;
            }
            InboundEvent::PrivateMessage(request) => {
                let to = UserKey::from_value(&request.to_user_id)?;
                let from = UserKey::from_value(&request.from_user_id)?;
                self.relay.relay(&from, &to, request.message).await;
            }
        }

        Ok(())
    }
}
