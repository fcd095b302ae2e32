//! Canonical identifiers for users and live connection endpoints.
//!
//! Clients identify users either by string or by number (`"42"` and `42`
//! name the same user). [`UserKey`] folds both into one textual key so a
//! user's presence is never split across two entries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use uuid::Uuid;

use crate::error::AppError;

/// Integral floats below this print as plain digits in JavaScript.
const PLAIN_DIGITS_LIMIT: f64 = 1e21;

/// Raw identity as it arrives on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawIdentity {
    /// Textual identity.
    Text(String),
    /// Numeric identity.
    Number(Number),
}

/// Canonical user identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawIdentity", into = "String")]
pub struct UserKey(String);

impl UserKey {
    /// Builds a key from a JSON value; only strings and numbers are identities.
    pub fn from_value(value: &Value) -> Result<Self, AppError> {
        match value {
            Value::String(s) => Self::from_text(s),
            Value::Number(n) => Ok(Self::from_number(n)),
            other => Err(AppError::validation(format!(
                "User identity must be a string or a number, got {}",
                json_type_name(other)
            ))),
        }
    }

    /// Builds a key from text, verbatim.
    pub fn from_text(text: &str) -> Result<Self, AppError> {
        if text.is_empty() {
            return Err(AppError::validation("User identity must not be empty"));
        }
        Ok(Self(text.to_string()))
    }

    /// Builds a key from a JSON number.
    pub fn from_number(number: &Number) -> Self {
        if let Some(i) = number.as_i64() {
            return Self(i.to_string());
        }
        if let Some(u) = number.as_u64() {
            return Self(u.to_string());
        }
        if let Some(f) = number.as_f64() {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < PLAIN_DIGITS_LIMIT {
                if f == 0.0 {
                    return Self("0".to_string());
                }
                // f64 Display never uses an exponent: shortest digits, zero padded.
                return Self(format!("{f}"));
            }
        }
        Self(number.to_string())
    }

    /// Returns the canonical textual form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<RawIdentity> for UserKey {
    type Error = AppError;

    fn try_from(raw: RawIdentity) -> Result<Self, Self::Error> {
        match raw {
            RawIdentity::Text(s) => Self::from_text(&s),
            RawIdentity::Number(n) => Ok(Self::from_number(&n)),
        }
    }
}

impl From<UserKey> for String {
    fn from(key: UserKey) -> Self {
        key.0
    }
}

impl From<i64> for UserKey {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for UserKey {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl FromStr for UserKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Identifier of one live connection (one browser tab's socket).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointId(String);

impl EndpointId {
    /// Generates a fresh random endpoint identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EndpointId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EndpointId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
