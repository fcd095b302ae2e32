//! Connection pool: all open endpoints by ID.

use std::sync::Arc;

use dashmap::DashMap;

use tbr_core::types::id::EndpointId;

use super::handle::ConnectionHandle;

/// Thread-safe pool of all open WebSocket connections.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    by_id: DashMap<EndpointId, Arc<ConnectionHandle>>,
}

impl ConnectionPool {
    /// Creates a new empty connection pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to the pool.
    pub fn add(&self, handle: Arc<ConnectionHandle>) {
        self.by_id.insert(handle.id.clone(), handle);
    }

    /// Removes a connection from the pool.
    pub fn remove(&self, id: &EndpointId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.remove(id).map(|(_, handle)| handle)
    }

    /// Gets a specific connection by ID.
    pub fn get(&self, id: &EndpointId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.get(id).map(|entry| entry.value().clone())
    }

    /// Whether the endpoint is open.
    pub fn contains(&self, id: &EndpointId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Returns total number of open connections.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Removes and returns every connection.
    pub fn drain(&self) -> Vec<Arc<ConnectionHandle>> {
        let ids: Vec<EndpointId> = self.by_id.iter().map(|entry| entry.key().clone()).collect();
        ids.iter().filter_map(|id| self.remove(id)).collect()
    }
}
