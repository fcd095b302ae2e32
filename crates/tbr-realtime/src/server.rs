//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use tbr_core::config::RealtimeConfig;

use crate::connection::heartbeat::HeartbeatConfig;
use crate::connection::manager::ConnectionManager;
use crate::dispatch::InboundDispatcher;
use crate::metrics::RealtimeMetrics;
use crate::relay::MessageRelay;

/// Central real-time engine that coordinates all WebSocket subsystems.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Connection manager (owns the presence registry).
    pub connections: Arc<ConnectionManager>,
    /// Private-message relay.
    pub relay: Arc<MessageRelay>,
    /// Inbound frame dispatcher.
    pub dispatcher: Arc<InboundDispatcher>,
    /// Metrics collector.
    pub metrics: Arc<RealtimeMetrics>,
    /// Keepalive settings for WebSocket tasks.
    heartbeat: HeartbeatConfig,
    /// Shutdown signal sender.
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine").finish()
    }
}

impl RealtimeEngine {
    /// Creates a new real-time engine with all subsystems.
    pub fn new(config: RealtimeConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let heartbeat = HeartbeatConfig::from_config(&config);
        let max_message_bytes = config.max_message_bytes;
        let metrics = Arc::new(RealtimeMetrics::new());
        let connections = Arc::new(ConnectionManager::new(config, metrics.clone()));
        let relay = Arc::new(MessageRelay::new(connections.clone(), metrics.clone()));
        let dispatcher = Arc::new(InboundDispatcher::new(
            connections.clone(),
            relay.clone(),
            metrics.clone(),
            max_message_bytes,
        ));

        info!("Real-time engine initialized");

        Self {
            connections,
            relay,
            dispatcher,
            metrics,
            heartbeat,
            shutdown_tx,
        }
    }

    /// Keepalive settings.
    pub fn heartbeat(&self) -> HeartbeatConfig {
        self.heartbeat
    }

    /// Returns a shutdown receiver for graceful shutdown coordination.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signals every connection task to stop and drops all presence.
    pub async fn shutdown(&self) {
        info!("Shutting down real-time engine");

        let _ = self.shutdown_tx.send(());
        self.connections.close_all().await;

        info!("Real-time engine shut down");
    }
}
