//! # tbr-realtime
//!
//! Real-time messaging engine for TBR3. Provides:
//!
//! - A presence registry mapping each user to their live endpoints
//! - Connection handles with bounded outbound buffers and heartbeat state
//! - Best-effort private-message relay to every live endpoint of a user
//! - Inbound event dispatch for the `register` / `private_message` protocol

pub mod connection;
pub mod dispatch;
pub mod message;
pub mod metrics;
pub mod presence;
pub mod relay;
pub mod server;

pub use connection::manager::ConnectionManager;
pub use dispatch::InboundDispatcher;
pub use presence::registry::PresenceRegistry;
pub use relay::{MessageRelay, RelayOutcome};
pub use server::RealtimeEngine;
