//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use tbr_core::error::{AppError, ErrorKind};

/// HTTP-facing wrapper around [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// Standard error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MsgBody {
    /// Human-readable message.
    pub msg: String,
}

impl MsgBody {
    /// Creates a body.
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// HTTP status for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Unauthenticated | ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::InvalidCredential | ErrorKind::MalformedCredential => StatusCode::UNAUTHORIZED,
        ErrorKind::Validation | ErrorKind::Serialization => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Configuration | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.kind);

        let msg = if status.is_server_error() {
            tracing::error!(error = %self.0, "Internal server error");
            "Server Error".to_string()
        } else {
            if self.0.kind.is_auth() {
                tracing::debug!(kind = %self.0.kind, msg = %self.0.message, "Request rejected");
            }
            self.0.message
        };

        (status, Json(MsgBody::new(msg))).into_response()
    }
}
