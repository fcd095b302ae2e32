//! Principal introspection.

use axum::Json;

use tbr_auth::Principal;

use crate::extractors::AuthUser;

/// GET /api/auth/me: the principal the bearer token resolves to
pub async fn me(AuthUser(principal): AuthUser) -> Json<Principal> {
    Json(principal)
}
