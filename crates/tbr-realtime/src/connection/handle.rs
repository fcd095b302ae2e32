//! Individual WebSocket connection handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, mpsc};

use tbr_core::types::id::EndpointId;

use crate::message::types::OutboundEvent;

/// A handle to a single live endpoint.
///
/// Holds the sender half of the endpoint's outbound buffer; the WebSocket
/// task owns the receiver and writes whatever arrives to the socket.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique endpoint ID
    pub id: EndpointId,
    /// Sender for outbound events
    sender: mpsc::Sender<OutboundEvent>,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
    /// Last pong received
    last_pong: RwLock<DateTime<Utc>>,
    /// Whether the connection is still alive
    alive: AtomicBool,
}

impl ConnectionHandle {
    /// Create a new connection handle
    pub fn new(id: EndpointId, sender: mpsc::Sender<OutboundEvent>) -> Self {
        let now = Utc::now();
        Self {
            id,
            sender,
            connected_at: now,
            last_pong: RwLock::new(now),
            alive: AtomicBool::new(true),
        }
    }

    /// Queue an event for this endpoint without waiting.
    ///
    /// Returns `false` when the event was dropped.
    pub fn send(&self, event: OutboundEvent) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(endpoint = %self.id, "Send buffer full, dropping event");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    /// Check if connection is alive
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark connection as dead
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Record a pong response
    pub async fn record_pong(&self) {
        *self.last_pong.write().await = Utc::now();
    }

    /// Time of the last pong (or of the connection, before any pong)
    pub async fn last_pong(&self) -> DateTime<Utc> {
        *self.last_pong.read().await
    }
}
