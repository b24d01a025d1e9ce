//! Board backend client.

use std::future::Future;

use tracing::{debug, info};
use tripleko_protocol::{BoardId, Endpoint, FramedEvent};

use crate::channel::{ExchangeMode, exchange, send_only};
use crate::config::ChannelConfig;
use crate::error::ChannelError;

/// Trait implemented by anything that can answer the gateway's backend calls.
/// The HTTP layer only talks to the backend through this.
pub trait BoardBackend: Send + Sync + 'static {
    /// Fetch a document from a retrieval endpoint (`Sgf` or `Sgfix`).
    fn retrieve(
        &self,
        board: &BoardId,
        endpoint: Endpoint,
    ) -> impl Future<Output = Result<Vec<u8>, ChannelError>> + Send;

    /// Deliver one event to the board's event endpoint.
    fn send_event(
        &self,
        board: &BoardId,
        event: &FramedEvent,
    ) -> impl Future<Output = Result<(), ChannelError>> + Send;

    /// Ask the backend to load the SGF document at `url` into `board`.
    fn request_sgf(
        &self,
        board: &BoardId,
        url: &str,
    ) -> impl Future<Output = Result<(), ChannelError>> + Send {
        let event = FramedEvent::request_sgf(url);
        async move { self.send_event(board, &event).await }
    }
}

/// Talks to the real backend, one fresh channel per call.
#[derive(Debug, Clone, Default)]
pub struct BackendClient {
    config: ChannelConfig,
}

impl BackendClient {
    pub fn new(config: ChannelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }
}

impl BoardBackend for BackendClient {
    async fn retrieve(&self, board: &BoardId, endpoint: Endpoint) -> Result<Vec<u8>, ChannelError> {
        let path = endpoint.path(board);
        let body = exchange(&self.config, &path, ExchangeMode::RecvOnly).await?;
        debug!("Retrieved {} bytes of {} for {board}", body.len(), endpoint.name());
        Ok(body)
    }

    async fn send_event(&self, board: &BoardId, event: &FramedEvent) -> Result<(), ChannelError> {
        let path = Endpoint::Events.path(board);
        send_only(&self.config, &path, event).await?;
        info!("Sent {} event to {path}", event.event);
        Ok(())
    }
}
