//! Channel error types.

use std::time::Duration;

use thiserror::Error;
use tokio_tungstenite::tungstenite;
use tripleko_protocol::ProtocolError;

/// Failure of a backend exchange. Every variant means the backend could not
/// deliver what was asked of it.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("cannot reach backend at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: Box<tungstenite::Error>,
    },

    #[error("exchange with {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("backend closed {url} before replying")]
    Closed { url: String },

    #[error("transport error on {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<tungstenite::Error>,
    },

    #[error("undecodable reply from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: ProtocolError,
    },

    #[error("cannot encode event: {0}")]
    Encode(#[source] ProtocolError),
}

impl ChannelError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Backend URL involved, when there is one.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Connect { url, .. }
            | Self::Timeout { url, .. }
            | Self::Closed { url }
            | Self::Transport { url, .. }
            | Self::Decode { url, .. } => Some(url),
            Self::Encode(_) => None,
        }
    }
}
