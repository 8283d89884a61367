//! Relay server configuration

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind; `0.0.0.0` listens on all of them
    pub host: String,
    pub port: u16,
    /// Directory served for every non-relay HTTP path
    pub static_dir: PathBuf,
    pub max_clients: usize,
    /// How often each connection is pinged
    pub ping_interval: Duration,
    /// Grace period after a missed ping before the connection is dropped
    pub ping_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from("public"),
            max_clients: 64,
            ping_interval: Duration::from_secs(25),
            ping_timeout: Duration::from_secs(20),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// Longest a connection may stay silent before it is considered gone
    pub fn idle_limit(&self) -> Duration {
        self.ping_interval + self.ping_timeout
    }
}
