//! JWT token verification.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use tbr_core::config::AuthConfig;
use tbr_core::AppResult;
use tbr_core::error::AppError;

use super::claims::Claims;

/// Verifies bearer tokens against the shared signing secret.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.leeway = config.leeway_seconds;
        // `exp` is checked when present; tokens without one stay valid.
        validation.set_required_spec_claims::<&str>(&[]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Verifies signature and expiry, returning the embedded claims.
    ///
    /// Every failure is an `InvalidCredential`; claim completeness is
    /// checked later when the principal is built.
    pub fn decode(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                JwtErrorKind::ExpiredSignature => AppError::invalid_credential("Token has expired"),
                JwtErrorKind::InvalidSignature => {
                    AppError::invalid_credential("Invalid token signature")
                }
                JwtErrorKind::InvalidToken | JwtErrorKind::Base64(_) => {
                    AppError::invalid_credential("Invalid token format")
                }
                _ => AppError::invalid_credential(format!("Token validation failed: {e}")),
            },
        )?;

        Ok(token_data.claims)
    }
}
