//! Authorization gate and admin gate as Axum middleware.
//!
//! `require_auth` runs the bearer gate and stores the resulting
//! [`Principal`] in the request extensions; `require_admin` must be layered
//! inside it.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use tbr_auth::Principal;
use tbr_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Rejects the request unless it carries a valid bearer token.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = match request.headers().get(AUTHORIZATION) {
        None => state.gate.authorize(None)?,
        Some(value) => {
            let header = value.to_str().map_err(|_| {
                AppError::unauthenticated("Malformed Authorization header, authorization denied")
            })?;
            state.gate.authorize(Some(header))?
        }
    };

    tracing::debug!(user_id = %principal.id, admin = principal.is_admin, "Request authorized");

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Rejects principals without the admin flag.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let principal = request
        .extensions()
        .get::<Principal>()
        .ok_or_else(|| AppError::unauthenticated("No token, authorization denied"))?;

    if let Err(e) = tbr_auth::require_admin(principal) {
        tracing::warn!(user_id = %principal.id, "Admin route refused");
        return Err(e.into());
    }

    Ok(next.run(request).await)
}
