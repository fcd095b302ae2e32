//! WebSocket connection management: handles, pool, heartbeat, lifecycle.

pub mod handle;
pub mod heartbeat;
pub mod manager;
pub mod pool;

pub use handle::ConnectionHandle;
pub use manager::ConnectionManager;
