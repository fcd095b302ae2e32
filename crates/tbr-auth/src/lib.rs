//! # tbr-auth
//!
//! Bearer-token authorization for TBR3.
//!
//! ## Modules
//!
//! - `jwt`: claims, token verification, and token issuance
//! - `principal`: the verified identity attached to a request
//! - `gate`: the authorization gate and the admin predicate

pub mod gate;
pub mod jwt;
pub mod principal;

pub use gate::{AuthGate, require_admin};
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use principal::Principal;
