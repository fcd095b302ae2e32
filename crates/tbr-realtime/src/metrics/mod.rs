//! Realtime engine counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level metrics counters.
#[derive(Debug, Default)]
pub struct RealtimeMetrics {
    connections_total: AtomicU64,
    connections_active: AtomicU64,
    registrations: AtomicU64,
    frames_received: AtomicU64,
    frames_rejected: AtomicU64,
    messages_relayed: AtomicU64,
    messages_dropped: AtomicU64,
    deliveries: AtomicU64,
}

impl RealtimeMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new connection
    pub fn connection_opened(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a disconnection
    pub fn connection_closed(&self) {
        self.connections_active.fetch_sub(1, Ordering::Relaxed);
    }

    /// Record a `register` event
    pub fn registration(&self) {
        self.registrations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a frame received from a client
    pub fn frame_received(&self) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a frame answered with an `error` event
    pub fn frame_rejected(&self) {
        self.frames_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a relay attempt and how many endpoints received it
    pub fn relayed(&self, delivered: usize) {
        if delivered == 0 {
            self.messages_dropped.fetch_add(1, Ordering::Relaxed);
        } else {
            self.messages_relayed.fetch_add(1, Ordering::Relaxed);
            self.deliveries.fetch_add(delivered as u64, Ordering::Relaxed);
        }
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            registrations: self.registrations.load(Ordering::Relaxed),
            frames_received: self.frames_received.load(Ordering::Relaxed),
            frames_rejected: self.frames_rejected.load(Ordering::Relaxed),
            messages_relayed: self.messages_relayed.load(Ordering::Relaxed),
            messages_dropped: self.messages_dropped.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Connections ever opened
    pub connections_total: u64,
    /// Currently open connections
    pub connections_active: u64,
    /// `register` events handled
    pub registrations: u64,
    /// Frames received from clients
    pub frames_received: u64,
    /// Frames rejected with an `error` event
    pub frames_rejected: u64,
    /// Messages delivered to at least one endpoint
    pub messages_relayed: u64,
    /// Messages dropped because the recipient had no live endpoint
    pub messages_dropped: u64,
    /// Individual endpoint deliveries
    pub deliveries: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_counters() {
        let metrics = RealtimeMetrics::new();
        metrics.relayed(0);
        metrics.relayed(2);
        metrics.relayed(1);

        let snap = metrics.snapshot();
        assert_eq!(snap.messages_dropped, 1);
        assert_eq!(snap.messages_relayed, 2);
        assert_eq!(snap.deliveries, 3);
    }

    #[test]
    fn test_connection_gauge() {
        let metrics = RealtimeMetrics::new();
        metrics.connection_opened();
        metrics.connection_opened();
        metrics.connection_closed();

        let snap = metrics.snapshot();
        assert_eq!(snap.connections_total, 2);
        assert_eq!(snap.connections_active, 1);
    }
}
