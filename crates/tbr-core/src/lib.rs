//! # tbr-core
//!
//! Core crate for TBR3. Contains configuration schemas, the canonical
//! user and endpoint identifiers, and the unified error system.
//!
//! This crate has **no** internal dependencies on other TBR3 crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
pub use types::id::{EndpointId, UserKey};
