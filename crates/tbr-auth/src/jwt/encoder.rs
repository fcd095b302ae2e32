//! JWT token issuance.

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};

use tbr_core::config::AuthConfig;
use tbr_core::AppResult;
use tbr_core::error::AppError;

use super::claims::Claims;
use crate::principal::Principal;

/// Signs HS256 bearer tokens with the shared secret.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Token lifetime.
    ttl: chrono::Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder").field("ttl", &self.ttl).finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl: chrono::Duration::minutes(config.token_ttl_minutes as i64),
        }
    }

    /// Issues a token for the given principal.
    pub fn issue(&self, principal: &Principal) -> AppResult<String> {
        self.sign(&Claims::for_principal(principal, Utc::now(), self.ttl))
    }

    /// Signs arbitrary claims.
    pub fn sign(&self, claims: &Claims) -> AppResult<String> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }
}
