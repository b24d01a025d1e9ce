//! Backend channel configuration.

use std::time::Duration;

/// Where the board backend lives and how long an exchange may take.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Backend hostname
    pub host: String,
    /// Backend port
    pub port: u16,
    /// Deadline for connect + send + receive of one exchange
    pub timeout: Duration,
    /// How long to wait for the peer's close frame after we close
    pub close_grace: Duration,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 9000,
            timeout: Duration::from_secs(10),
            close_grace: Duration::from_millis(500),
        }
    }
}

impl ChannelConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full channel URL for an endpoint path such as `/b/abc/sgf`.
    pub fn url(&self, path: &str) -> String {
        format!("ws://{}:{}{path}", self.host, self.port)
    }
}
