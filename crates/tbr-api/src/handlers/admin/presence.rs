//! Presence inspection.

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use tbr_core::types::id::{EndpointId, UserKey};
use tbr_realtime::presence::registry::OnlineUser;

use crate::error::ApiError;
use crate::state::AppState;

/// All online users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceListResponse {
    /// Open WebSocket connections, registered or not.
    pub connections: usize,
    /// Online users ordered by identity.
    pub users: Vec<OnlineUser>,
}

/// One user's presence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPresenceResponse {
    /// Canonical identity that was looked up.
    pub user_id: UserKey,
    /// Whether at least one endpoint is registered.
    pub online: bool,
    /// Registered endpoints, empty when offline.
    pub endpoints: Vec<EndpointId>,
}

/// GET /api/admin/presence
pub async fn list_online(State(state): State<AppState>) -> Json<PresenceListResponse> {
    let connections = &state.realtime.connections;
    Json(PresenceListResponse {
        connections: connections.connection_count(),
        users: connections.online_users().await,
    })
}

/// GET /api/admin/presence/{user_id}
pub async fn user_presence(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserPresenceResponse>, ApiError> {
    let user = UserKey::from_text(&user_id)?;
    let endpoints: Vec<EndpointId> = state
        .realtime
        .connections
        .lookup(&user)
        .await
        .into_iter()
        .collect();

    Ok(Json(UserPresenceResponse {
        user_id: user,
        online: !endpoints.is_empty(),
        endpoints,
    }))
}
