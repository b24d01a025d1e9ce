//! Gateway HTTP configuration.

use std::path::PathBuf;

/// HTTP listener and asset locations.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Port to listen on (0 for OS-assigned)
    pub port: u16,
    /// Hostname to bind to
    pub hostname: String,
    /// Directory holding page and script templates
    pub templates_dir: PathBuf,
    /// Directory served under `/static` (favicon lives here)
    pub static_dir: PathBuf,
    /// Maximum requests handled at once
    pub max_concurrent_requests: Option<usize>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            hostname: "127.0.0.1".into(),
            templates_dir: PathBuf::from("frontend/templates"),
            static_dir: PathBuf::from("frontend/static"),
            max_concurrent_requests: Some(256),
        }
    }
}
