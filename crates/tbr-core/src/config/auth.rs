//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Placeholder secret shipped in the default configuration.
pub const PLACEHOLDER_JWT_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

/// Bearer-token configuration shared by the gate and the token issuer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Lifetime of issued tokens in minutes.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: u64,
    /// Clock skew tolerated when checking `exp`, in seconds.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_minutes: default_token_ttl(),
            leeway_seconds: default_leeway(),
        }
    }
}

impl AuthConfig {
    /// Whether the shipped placeholder secret is still in use.
    pub fn uses_placeholder_secret(&self) -> bool {
        self.jwt_secret == PLACEHOLDER_JWT_SECRET
    }
}

fn default_jwt_secret() -> String {
    PLACEHOLDER_JWT_SECRET.to_string()
}

fn default_token_ttl() -> u64 {
    60
}

fn default_leeway() -> u64 {
    5
}
