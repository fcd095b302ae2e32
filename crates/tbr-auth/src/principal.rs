//! The verified identity attached to an authenticated request.

use serde::{Deserialize, Serialize};

use tbr_core::error::AppError;
use tbr_core::types::id::UserKey;

use crate::jwt::claims::Claims;

/// Identity and privilege derived from a verified credential.
///
/// Never persisted; rebuilt from the token on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Canonical user identity.
    pub id: UserKey,
    /// Whether the user may reach admin-only surfaces.
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

impl Principal {
    /// Creates a principal directly.
    pub fn new(id: UserKey, is_admin: bool) -> Self {
        Self { id, is_admin }
    }

    /// Derives a principal from verified claims.
    pub fn from_claims(claims: &Claims) -> Result<Self, AppError> {
        let raw = claims
            .id
            .as_ref()
            .ok_or_else(|| AppError::malformed_credential("Token is missing the user identity"))?;

        let id = UserKey::from_value(raw).map_err(|e| {
            AppError::malformed_credential(format!("Token carries an unusable identity: {}", e.message))
        })?;

        Ok(Self {
            id,
            is_admin: claims.admin_flag(),
        })
    }
}
