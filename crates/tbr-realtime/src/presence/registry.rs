//! Presence registry: which live endpoints each user currently has.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use tbr_core::types::id::{EndpointId, UserKey};

/// Maps users to their live endpoints.
///
/// A user has an entry iff at least one endpoint is registered for it, and
/// every endpoint belongs to exactly one user. The reverse index keeps
/// `deregister` from scanning every entry.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    /// User → live endpoints (never empty).
    by_user: HashMap<UserKey, BTreeSet<EndpointId>>,
    /// Endpoint → owning user.
    by_endpoint: HashMap<EndpointId, UserKey>,
}

/// Result of a `register` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The endpoint was added to the user's set.
    Added,
    /// The pair was already registered.
    Unchanged,
    /// The endpoint moved away from a previous owner.
    Moved {
        /// User the endpoint belonged to before.
        previous: UserKey,
    },
}

impl PresenceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `endpoint` to `user`'s set; the last registration of an endpoint wins.
    pub fn register(&mut self, user: UserKey, endpoint: EndpointId) -> Registration {
        let current = self.by_endpoint.get(&endpoint).cloned();
        let previous = match current {
            Some(owner) if owner == user => return Registration::Unchanged,
            Some(_) => self.deregister(&endpoint),
            None => None,
        };

        self.by_user
            .entry(user.clone())
            .or_default()
            .insert(endpoint.clone());
        self.by_endpoint.insert(endpoint.clone(), user.clone());

        tracing::debug!(user_id = %user, endpoint = %endpoint, "Endpoint registered");

        match previous {
            Some(previous) => Registration::Moved { previous },
            None => Registration::Added,
        }
    }

    /// Removes `endpoint` from its owner, dropping the owner's entry when emptied.
    ///
    /// Returns the former owner, or `None` if the endpoint was unknown.
    pub fn deregister(&mut self, endpoint: &EndpointId) -> Option<UserKey> {
        let owner = self.by_endpoint.remove(endpoint)?;

        if let Some(endpoints) = self.by_user.get_mut(&owner) {
            endpoints.remove(endpoint);
            if endpoints.is_empty() {
                self.by_user.remove(&owner);
                tracing::debug!(user_id = %owner, "Last endpoint gone, user offline");
            }
        }

        tracing::debug!(user_id = %owner, endpoint = %endpoint, "Endpoint deregistered");
        Some(owner)
    }

    /// Returns the user's live endpoints (empty when the user is offline).
    pub fn lookup(&self, user: &UserKey) -> BTreeSet<EndpointId> {
        self.by_user.get(user).cloned().unwrap_or_default()
    }

    /// Returns the user owning `endpoint`, if any.
    pub fn owner_of(&self, endpoint: &EndpointId) -> Option<&UserKey> {
        self.by_endpoint.get(endpoint)
    }

    /// Whether the user has at least one live endpoint.
    pub fn is_online(&self, user: &UserKey) -> bool {
        self.by_user.contains_key(user)
    }

    /// Number of users with at least one live endpoint.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    /// Number of registered endpoints across all users.
    pub fn endpoint_count(&self) -> usize {
        self.by_endpoint.len()
    }

    /// Snapshot of every online user, ordered by identity.
    pub fn online_users(&self) -> Vec<OnlineUser> {
        let mut users: Vec<OnlineUser> = self
            .by_user
            .iter()
            .map(|(user, endpoints)| OnlineUser {
                user_id: user.clone(),
                endpoints: endpoints.len(),
            })
            .collect();
        users.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        users
    }
}

/// Online user info.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineUser {
    /// Canonical user identity.
    pub user_id: UserKey,
    /// Number of live endpoints.
    pub endpoints: usize,
}
