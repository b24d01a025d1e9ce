//! Scripted in-process backend.
//!
//! Accepts WebSocket channels on any path, answers each path with a canned
//! reply, and records every message a client wrote before closing. The
//! gateway crates test their backend traffic against it.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    http::Uri,
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::ChannelConfig;

/// What the stub sends on a freshly opened channel.
#[derive(Debug, Clone)]
pub enum StubReply {
    /// One text message.
    Text(String),
    /// One binary message.
    Binary(Vec<u8>),
    /// A close frame, no data.
    Close,
    /// Nothing; only listen.
    Silent,
}

/// Everything one client connection wrote, in order.
#[derive(Debug, Clone)]
pub struct Received {
    pub path: String,
    pub messages: Vec<Vec<u8>>,
}

struct StubState {
    replies: HashMap<String, StubReply>,
    received_tx: mpsc::UnboundedSender<Received>,
}

/// A running stub backend.
pub struct StubBackend {
    port: u16,
    received_rx: mpsc::UnboundedReceiver<Received>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl StubBackend {
    /// Start on an OS-assigned localhost port. Paths without a scripted reply
    /// behave as `StubReply::Silent`.
    pub async fn start<I, P>(replies: I) -> std::io::Result<Self>
    where
        I: IntoIterator<Item = (P, StubReply)>,
        P: Into<String>,
    {
        let (received_tx, received_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);

        let state = Arc::new(StubState {
            replies: replies.into_iter().map(|(p, r)| (p.into(), r)).collect(),
            received_tx,
        });

        let app = Router::new().fallback(upgrade_handler).with_state(state);

        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let port = listener.local_addr()?.port();

        info!("Stub backend listening on ws://127.0.0.1:{port}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.recv().await;
                })
                .await
                .ok();
        });

        Ok(Self {
            port,
            received_rx,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Channel configuration pointing at this stub.
    pub fn config(&self) -> ChannelConfig {
        ChannelConfig::new("127.0.0.1", self.port)
    }

    /// Wait up to `wait` for the next finished connection.
    pub async fn next_received(&mut self, wait: Duration) -> Option<Received> {
        tokio::time::timeout(wait, self.received_rx.recv())
            .await
            .ok()
            .flatten()
    }

    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }
        info!("Stub backend stopped");
    }
}

async fn upgrade_handler(
    ws: WebSocketUpgrade,
    uri: Uri,
    State(state): State<Arc<StubState>>,
) -> impl IntoResponse {
    let path = uri.path().to_string();
    ws.on_upgrade(move |socket| handle_channel(socket, path, state))
}

async fn handle_channel(socket: WebSocket, path: String, state: Arc<StubState>) {
    debug!("Stub channel opened: {path}");
    let (mut tx, mut rx) = socket.split();

    let reply = state.replies.get(&path).cloned().unwrap_or(StubReply::Silent);
    let sent = match reply {
        StubReply::Text(text) => tx.send(Message::Text(text.into())).await,
        StubReply::Binary(data) => tx.send(Message::Binary(data.into())).await,
        StubReply::Close => tx.send(Message::Close(None)).await,
        StubReply::Silent => Ok(()),
    };
    if let Err(e) = sent {
        debug!("Stub reply on {path} failed: {e}");
    }

    let mut messages = Vec::new();
    while let Some(Ok(msg)) = rx.next().await {
        match msg {
            Message::Binary(data) => messages.push(data.to_vec()),
            Message::Text(text) => messages.push(text.as_str().as_bytes().to_vec()),
            Message::Close(_) => break,
            _ => {}
        }
    }

    debug!("Stub channel closed: {path} ({} messages)", messages.len());
    let _ = state.received_tx.send(Received { path, messages });
}
