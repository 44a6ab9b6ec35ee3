//! Server configuration.

use std::ops::RangeInclusive;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_CLIENT_PORT: u16 = 8050;
pub const DEFAULT_PEER_PORT: u16 = 9090;
pub const DEFAULT_STORE_URL: &str = "redis://127.0.0.1:6379";
pub const DEFAULT_KEEPALIVE_SECS: u64 = 10;
pub const DEFAULT_FLUSH_SECS: u64 = 30;

/// Runtime settings for [`crate::ui::Server`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    /// WebSocket / HTTP port.
    pub client_port: u16,
    /// TCP port for peer links.
    pub peer_port: u16,
    /// Durable store URL. `None` keeps the board in process memory only.
    pub store_url: Option<String>,
    /// Peer addresses dialed once at startup.
    pub peers: Vec<String>,
    pub keepalive_interval: Duration,
    pub flush_interval: Duration,
    /// Random wait before the scheduler declares itself leader.
    pub election_delay_ms: RangeInclusive<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            client_port: DEFAULT_CLIENT_PORT,
            peer_port: DEFAULT_PEER_PORT,
            store_url: Some(DEFAULT_STORE_URL.to_string()),
            peers: Vec::new(),
            keepalive_interval: Duration::from_secs(DEFAULT_KEEPALIVE_SECS),
            flush_interval: Duration::from_secs(DEFAULT_FLUSH_SECS),
            election_delay_ms: 150..=450,
        }
    }
}

impl ServerConfig {
    pub fn client_addr(&self) -> String {
        format!("{}:{}", self.host, self.client_port)
    }

    pub fn peer_addr(&self) -> String {
        format!("{}:{}", self.host, self.peer_port)
    }
}
