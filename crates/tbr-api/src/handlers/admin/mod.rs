//! Admin-only handlers.

pub mod presence;
