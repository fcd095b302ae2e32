//! Ping/pong keepalive settings.

use std::time::Duration;

use chrono::{DateTime, Utc};

use tbr_core::config::RealtimeConfig;

/// Heartbeat configuration
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatConfig {
    /// Interval between pings
    pub ping_interval: Duration,
    /// How long a pong may lag behind its ping
    pub ping_timeout: Duration,
}

impl HeartbeatConfig {
    /// Builds heartbeat settings from the realtime configuration.
    pub fn from_config(config: &RealtimeConfig) -> Self {
        Self {
            ping_interval: Duration::from_secs(config.ping_interval_seconds),
            ping_timeout: Duration::from_secs(config.ping_timeout_seconds),
        }
    }

    /// Whether a connection whose last pong was at `last_pong` is dead at `now`.
    ///
    /// A pong answers the previous ping, so it may be up to one interval
    /// plus the timeout old before the peer is given up on.
    pub fn is_expired(&self, last_pong: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let allowed = self.ping_interval + self.ping_timeout;
        match (now - last_pong).to_std() {
            Ok(elapsed) => elapsed > allowed,
            Err(_) => false,
        }
    }
}
