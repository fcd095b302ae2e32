//! Authorization gate: bearer credential in, principal out.

use tbr_core::config::AuthConfig;
use tbr_core::AppResult;
use tbr_core::error::AppError;

use crate::jwt::decoder::JwtDecoder;
use crate::principal::Principal;

/// Authentication scheme expected in the `Authorization` header.
const BEARER_SCHEME: &str = "Bearer";

/// Validates bearer credentials and produces principals.
///
/// Stateless: every call decides from the header and the signing secret
/// alone, so one gate is shared by all requests.
#[derive(Debug, Clone)]
pub struct AuthGate {
    decoder: JwtDecoder,
}

impl AuthGate {
    /// Creates a gate verifying with the configured secret.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            decoder: JwtDecoder::new(config),
        }
    }

    /// Authorizes a request from its raw `Authorization` header value.
    ///
    /// 1. Missing header, or no token segment → `Unauthenticated`
    /// 2. Bad signature, bad format, or expired → `InvalidCredential`
    /// 3. Verified but no usable identity claim → `MalformedCredential`
    pub fn authorize(&self, header: Option<&str>) -> AppResult<Principal> {
        let header =
            header.ok_or_else(|| AppError::unauthenticated("No token, authorization denied"))?;
        let token = bearer_token(header).ok_or_else(|| {
            AppError::unauthenticated("Malformed Authorization header, authorization denied")
        })?;
        self.authorize_token(token)
    }

    /// Authorizes a bare token (e.g. from a WebSocket query string).
    pub fn authorize_token(&self, token: &str) -> AppResult<Principal> {
        let claims = self.decoder.decode(token).inspect_err(|e| {
            tracing::debug!(error = %e.message, "Rejected bearer token");
        })?;
        Principal::from_claims(&claims)
    }
}

/// Admin-only predicate layered on top of the gate.
pub fn require_admin(principal: &Principal) -> AppResult<()> {
    if !principal.is_admin {
        return Err(AppError::forbidden("Admin access required"));
    }
    Ok(())
}

/// Extracts the token segment of a `Bearer <token>` header.
fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split_whitespace();
    let scheme = parts.next()?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    let token = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some(token)
}
