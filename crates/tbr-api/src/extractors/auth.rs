//! `AuthUser` extractor: the principal placed by the auth middleware.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use tbr_auth::Principal;
use tbr_core::error::AppError;

use crate::error::ApiError;

/// Authenticated principal available in handlers behind `require_auth`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl std::ops::Deref for AuthUser {
    type Target = Principal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::unauthenticated("No token, authorization denied").into())
    }
}
