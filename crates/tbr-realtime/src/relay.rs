//! Best-effort private-message relay.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use tbr_core::types::id::UserKey;

use crate::connection::manager::ConnectionManager;
use crate::message::types::{OutboundEvent, PrivateMessageDelivery};
use crate::metrics::RealtimeMetrics;

/// What happened to one relayed message. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelayOutcome {
    /// Live endpoints the recipient had at relay time.
    pub targeted: usize,
    /// Endpoints the event was queued for.
    pub delivered: usize,
}

/// Fans private messages out to every live endpoint of the recipient.
///
/// At-most-once and fire-and-forget: an offline recipient means the
/// message is dropped, and a failing endpoint never affects the others.
#[derive(Debug)]
pub struct MessageRelay {
    connections: Arc<ConnectionManager>,
    metrics: Arc<RealtimeMetrics>,
}

impl MessageRelay {
    /// Creates a relay over the given connections.
    pub fn new(connections: Arc<ConnectionManager>, metrics: Arc<RealtimeMetrics>) -> Self {
        Self {
            connections,
            metrics,
        }
    }

    /// Relays `message` from `from` to every live endpoint of `to`.
    pub async fn relay(&self, from: &UserKey, to: &UserKey, message: Value) -> RelayOutcome {
        let targets = self.connections.live_handles(to).await;

        if targets.is_empty() {
            debug!(from_user_id = %from, to_user_id = %to, "Recipient offline, message dropped");
            self.metrics.relayed(0);
            return RelayOutcome::default();
        }

        let event = OutboundEvent::PrivateMessage(PrivateMessageDelivery {
            from_user_id: from.clone(),
            message,
            timestamp: Utc::now(),
        });

        let delivered = targets
            .iter()
            .filter(|handle| handle.send(event.clone()))
            .count();

        self.metrics.relayed(delivered);
        debug!(
            from_user_id = %from,
            to_user_id = %to,
            targeted = targets.len(),
            delivered,
            "Private message relayed"
        );

        RelayOutcome {
            targeted: targets.len(),
            delivered,
        }
    }
}
