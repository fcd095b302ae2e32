//! Connection manager: endpoint lifecycle and the presence registry.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info, warn};

use tbr_core::config::RealtimeConfig;
use tbr_core::error::AppError;
use tbr_core::types::id::{EndpointId, UserKey};

use crate::message::types::OutboundEvent;
use crate::metrics::RealtimeMetrics;
use crate::presence::registry::{OnlineUser, PresenceRegistry, Registration};

use super::handle::ConnectionHandle;
use super::pool::ConnectionPool;

/// Manages all open WebSocket connections and who they belong to.
///
/// Every registry mutation happens inside one write-lock section with no
/// `.await` in it, so connect/register/disconnect events apply one at a
/// time. Readers (relay, admin views) work on snapshots.
#[derive(Debug)]
pub struct ConnectionManager {
    /// Open endpoints.
    pool: ConnectionPool,
    /// User → endpoints.
    registry: RwLock<PresenceRegistry>,
    /// Metrics.
    metrics: Arc<RealtimeMetrics>,
    /// Configuration.
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Creates a new connection manager with an empty registry.
    pub fn new(config: RealtimeConfig, metrics: Arc<RealtimeMetrics>) -> Self {
        Self {
            pool: ConnectionPool::new(),
            registry: RwLock::new(PresenceRegistry::new()),
            metrics,
            config,
        }
    }

    /// Opens a new endpoint.
    ///
    /// Returns the connection handle and a receiver for outbound events.
    /// The endpoint receives nothing until it is registered to a user.
    pub fn open(&self) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundEvent>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(EndpointId::generate(), tx));

        self.pool.add(handle.clone());
        self.metrics.connection_opened();

        info!(endpoint = %handle.id, "WebSocket connection opened");

        (handle, rx)
    }

    /// Binds an open endpoint to a user.
    pub async fn register(
        &self,
        endpoint: &EndpointId,
        user: UserKey,
    ) -> Result<Registration, AppError> {
        let mut registry = self.registry.write().await;

        if !self.pool.contains(endpoint) {
            return Err(AppError::not_found(format!(
                "Endpoint {endpoint} is not connected"
            )));
        }

        let outcome = registry.register(user.clone(), endpoint.clone());
        drop(registry);

        self.metrics.registration();
        match &outcome {
            Registration::Moved { previous } => info!(
                endpoint = %endpoint,
                user_id = %user,
                previous_user_id = %previous,
                "Endpoint re-registered to another user"
            ),
            Registration::Added => info!(endpoint = %endpoint, user_id = %user, "User registered"),
            Registration::Unchanged => debug!(endpoint = %endpoint, user_id = %user, "Repeat registration"),
        }

        Ok(outcome)
    }

    /// Closes an endpoint: deregisters it and drops its handle.
    ///
    /// Safe to call more than once; returns the user it was registered to.
    pub async fn close(&self, endpoint: &EndpointId) -> Option<UserKey> {
        let mut registry = self.registry.write().await;
        let owner = registry.deregister(endpoint);
        let handle = self.pool.remove(endpoint);
        drop(registry);

        if let Some(handle) = handle {
            handle.mark_dead();
            self.metrics.connection_closed();
            info!(
                endpoint = %endpoint,
                user_id = owner.as_ref().map(|u| u.as_str()).unwrap_or("-"),
                "WebSocket connection closed"
            );
        }

        owner
    }

    /// Snapshot of the live handles of a user.
    pub async fn live_handles(&self, user: &UserKey) -> Vec<Arc<ConnectionHandle>> {
        let registry = self.registry.read().await;
        registry
            .lookup(user)
            .iter()
            .filter_map(|endpoint| self.pool.get(endpoint))
            .collect()
    }

    /// The user's registered endpoints.
    pub async fn lookup(&self, user: &UserKey) -> BTreeSet<EndpointId> {
        self.registry.read().await.lookup(user)
    }

    /// The user an endpoint is registered to.
    pub async fn owner_of(&self, endpoint: &EndpointId) -> Option<UserKey> {
        self.registry.read().await.owner_of(endpoint).cloned()
    }

    /// Every online user with their endpoint count.
    pub async fn online_users(&self) -> Vec<OnlineUser> {
        self.registry.read().await.online_users()
    }

    /// Number of online users.
    pub async fn user_count(&self) -> usize {
        self.registry.read().await.user_count()
    }

    /// Number of open connections, registered or not.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Sends an event to one endpoint.
    pub fn send_to(&self, endpoint: &EndpointId, event: OutboundEvent) -> bool {
        match self.pool.get(endpoint) {
            Some(handle) => handle.send(event),
            None => {
                warn!(endpoint = %endpoint, "Event for unknown endpoint");
                false
            }
        }
    }

    /// Closes every connection and forgets all presence.
    pub async fn close_all(&self) {
        let mut registry = self.registry.write().await;
        let handles = self.pool.drain();
        for handle in &handles {
            registry.deregister(&handle.id);
            handle.mark_dead();
            self.metrics.connection_closed();
        }
        drop(registry);

        info!(count = handles.len(), "All connections closed");
    }
}
