//! Single-use WebSocket channels to the board backend.
//!
//! A channel is opened for exactly one logical exchange and closed before
//! the caller returns. There is no pooling: two HTTP requests never share a
//! connection, so one request's exchange cannot see another's messages.

use std::future::Future;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::{Instant, timeout, timeout_at};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tracing::debug;
use tripleko_protocol::{FramedEvent, decode_reply};

use crate::config::ChannelConfig;
use crate::error::ChannelError;

/// Concrete WebSocket stream type.
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// What a retrieval exchange does after connecting.
#[derive(Debug, Clone)]
pub enum ExchangeMode {
    /// Wait for one reply message.
    RecvOnly,
    /// Write a framed event, then wait for one reply message.
    SendThenRecv(FramedEvent),
}

/// An open channel to one backend endpoint.
pub struct Channel {
    url: String,
    ws: WsStream,
}

impl Channel {
    /// Connect to `url`.
    pub async fn open(url: &str) -> Result<Self, ChannelError> {
        let (ws, _response) = connect_async(url).await.map_err(|e| ChannelError::Connect {
            url: url.to_string(),
            source: Box::new(e),
        })?;
        debug!("Channel open: {url}");
        Ok(Self {
            url: url.to_string(),
            ws,
        })
    }

    /// Write a framed event as two binary messages: header, then payload.
    pub async fn send_event(&mut self, event: &FramedEvent) -> Result<(), ChannelError> {
        let (header, payload) = event.encode().map_err(ChannelError::Encode)?;
        self.send_binary(header.to_vec()).await?;
        self.send_binary(payload).await
    }

    async fn send_binary(&mut self, data: Vec<u8>) -> Result<(), ChannelError> {
        self.ws
            .send(Message::Binary(data.into()))
            .await
            .map_err(|e| ChannelError::Transport {
                url: self.url.clone(),
                source: Box::new(e),
            })
    }

    /// Wait for the next data message and decode it as a base64 reply.
    ///
    /// Control frames are skipped. A close (or end of stream) before any data
    /// message is `ChannelError::Closed`.
    pub async fn recv_reply(&mut self) -> Result<Vec<u8>, ChannelError> {
        let raw = loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => break text.as_bytes().to_vec(),
                Some(Ok(Message::Binary(data))) => break data.to_vec(),
                Some(Ok(Message::Close(_))) | None => {
                    return Err(ChannelError::Closed {
                        url: self.url.clone(),
                    });
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    return Err(ChannelError::Transport {
                        url: self.url.clone(),
                        source: Box::new(e),
                    });
                }
            }
        };

        decode_reply(&raw).map_err(|e| ChannelError::Decode {
            url: self.url.clone(),
            source: e,
        })
    }

    /// Send a close frame and give the peer `grace` to answer it.
    ///
    /// Failures here are logged and dropped: the exchange result is already
    /// decided by the time a channel is closed.
    pub async fn close(mut self, grace: std::time::Duration) {
        if let Err(e) = self.ws.close(None).await {
            debug!("Close frame to {} not sent: {e}", self.url);
            return;
        }
        let drained = timeout(grace, async {
            while let Some(Ok(_)) = self.ws.next().await {}
        })
        .await;
        if drained.is_err() {
            debug!("No close acknowledgement from {} within {grace:?}", self.url);
        }
        debug!("Channel closed: {}", self.url);
    }
}

/// Run `fut` against the exchange deadline.
async fn within<T>(
    deadline: Instant,
    config: &ChannelConfig,
    url: &str,
    fut: impl Future<Output = Result<T, ChannelError>>,
) -> Result<T, ChannelError> {
    timeout_at(deadline, fut)
        .await
        .unwrap_or_else(|_| {
            Err(ChannelError::Timeout {
                url: url.to_string(),
                timeout: config.timeout,
            })
        })
}

/// Open a channel at `path`, perform one exchange, close it.
pub async fn exchange(
    config: &ChannelConfig,
    path: &str,
    mode: ExchangeMode,
) -> Result<Vec<u8>, ChannelError> {
    let url = config.url(path);
    let deadline = Instant::now() + config.timeout;

    let mut channel = within(deadline, config, &url, Channel::open(&url)).await?;
    let result = within(deadline, config, &url, async {
        if let ExchangeMode::SendThenRecv(event) = &mode {
            channel.send_event(event).await?;
        }
        channel.recv_reply().await
    })
    .await;
    channel.close(config.close_grace).await;

    result
}

/// Open a channel at `path`, write one framed event, close it. No reply is
/// read; success means the bytes reached the transport.
pub async fn send_only(
    config: &ChannelConfig,
    path: &str,
    event: &FramedEvent,
) -> Result<(), ChannelError> {
    let url = config.url(path);
    let deadline = Instant::now() + config.timeout;

    let mut channel = within(deadline, config, &url, Channel::open(&url)).await?;
    let result = within(deadline, config, &url, channel.send_event(event)).await;
    channel.close(config.close_grace).await;

    result
}
