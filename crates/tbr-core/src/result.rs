//! Convenience result type alias for TBR3.

use crate::error::AppError;

/// A specialized `Result` type for TBR3 operations.
pub type AppResult<T> = Result<T, AppError>;
