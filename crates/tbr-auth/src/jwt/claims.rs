//! JWT claims carried by TBR3 bearer tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::principal::Principal;

/// Claims payload of a bearer token.
///
/// The identity claim is kept as a raw JSON value: tokens issued by the
/// account service carry numeric ids, older ones carry strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Claims {
    /// User identity (string or number).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Admin flag; anything other than `true` means not an admin.
    #[serde(rename = "isAdmin", default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<Value>,
    /// Issued-at timestamp (seconds since epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiration timestamp (seconds since epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Claims for a principal, valid for `ttl` from `now`.
    pub fn for_principal(principal: &Principal, now: DateTime<Utc>, ttl: chrono::Duration) -> Self {
        Self {
            id: Some(Value::String(principal.id.as_str().to_string())),
            is_admin: Some(Value::Bool(principal.is_admin)),
            iat: Some(now.timestamp()),
            exp: Some((now + ttl).timestamp()),
        }
    }

    /// Whether the admin claim is exactly `true`.
    pub fn admin_flag(&self) -> bool {
        matches!(self.is_admin, Some(Value::Bool(true)))
    }

    /// Returns the expiration as a `DateTime<Utc>`, if present.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }
}
