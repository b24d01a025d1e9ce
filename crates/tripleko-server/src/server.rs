//! Gateway HTTP server lifecycle.

use std::sync::Arc;

use tokio::sync::mpsc;
use tower::limit::GlobalConcurrencyLimitLayer;
use tracing::info;
use tripleko_transport::BoardBackend;

use crate::config::GatewayConfig;
use crate::router::{GatewayState, gateway_router};
use crate::templates::TemplateStore;

/// The running gateway. Owns the listener task.
pub struct GatewayServer {
    /// Shutdown signal
    shutdown_tx: Option<mpsc::Sender<()>>,
    /// Server task handle
    handle: Option<tokio::task::JoinHandle<()>>,
    /// Actual bound port
    port: u16,
}

impl GatewayServer {
    /// Bind and start serving with the given backend.
    pub async fn start<B: BoardBackend>(
        config: GatewayConfig,
        backend: B,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);

        let state = Arc::new(GatewayState::new(
            backend,
            TemplateStore::new(&config.templates_dir),
        ));

        let mut app = gateway_router(state, &config.static_dir);
        if let Some(max) = config.max_concurrent_requests {
            // Router::layer wraps each route separately; the permits must be
            // shared by all of them.
            app = app.layer(GlobalConcurrencyLimitLayer::new(max));
        }

        let listener =
            tokio::net::TcpListener::bind((config.hostname.as_str(), config.port)).await?;
        let actual_port = listener.local_addr()?.port();

        info!("Tripleko gateway listening on http://{}:{}", config.hostname, actual_port);
        info!("Templates: {}", config.templates_dir.display());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.recv().await;
                })
                .await
                .ok();
        });

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
            port: actual_port,
        })
    }

    /// Get the actual bound port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Gracefully stop the server.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        info!("Tripleko gateway stopped");
    }
}
