//! Tripleko Gateway: browser-facing front end of the board service
//!
//! Serves the board pages and relays SGF retrieval and upload requests to
//! the board-state backend, one short-lived WebSocket channel per request.
//!
//! Usage:
//!   tripleko-gateway                                   # :8080, backend localhost:9000
//!   tripleko-gateway --port 8000                       # Custom port
//!   tripleko-gateway --backend-host 10.0.0.5           # Remote backend
//!   tripleko-gateway --templates ./frontend/templates  # Template directory

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tripleko_server::{GatewayConfig, GatewayServer};
use tripleko_transport::{BackendClient, ChannelConfig};

#[derive(Parser, Debug)]
#[command(name = "tripleko-gateway", about = "Tripleko Gateway: board pages and backend relay")]
struct Cli {
    /// Port to listen on (0 for OS-assigned)
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Hostname to bind to
    #[arg(long, default_value = "127.0.0.1")]
    hostname: String,

    /// Board backend host
    #[arg(long, default_value = "localhost")]
    backend_host: String,

    /// Board backend port
    #[arg(long, default_value = "9000")]
    backend_port: u16,

    /// Deadline for one backend exchange, in milliseconds
    #[arg(long, default_value = "10000")]
    backend_timeout_ms: u64,

    /// Directory of page and script templates
    #[arg(long, default_value = "frontend/templates")]
    templates: PathBuf,

    /// Directory served under /static
    #[arg(long, default_value = "frontend/static")]
    static_dir: PathBuf,

    /// Maximum requests handled at once
    #[arg(long, default_value = "256")]
    max_concurrent_requests: usize,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_tracing(cli: &Cli) -> std::io::Result<()> {
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match (&cli.log_file, cli.log_json) {
        (Some(path), json) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            let builder = builder.with_writer(std::sync::Mutex::new(file)).with_ansi(false);
            if json {
                builder.json().init();
            } else {
                builder.init();
            }
            eprintln!("Logging to {}", path.display());
        }
        (None, true) => builder.json().init(),
        (None, false) => builder.init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli) {
        eprintln!("Failed to set up logging: {e}");
        std::process::exit(1);
    }

    let channel = ChannelConfig::new(cli.backend_host.clone(), cli.backend_port)
        .with_timeout(Duration::from_millis(cli.backend_timeout_ms));
    let backend_url = channel.url("/b/<id>");

    let config = GatewayConfig {
        port: cli.port,
        hostname: cli.hostname.clone(),
        templates_dir: cli.templates.clone(),
        static_dir: cli.static_dir.clone(),
        max_concurrent_requests: Some(cli.max_concurrent_requests),
    };

    if !config.templates_dir.is_dir() {
        error!("Template directory {} does not exist", config.templates_dir.display());
        std::process::exit(1);
    }

    let mut server = match GatewayServer::start(config, BackendClient::new(channel)).await {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to start gateway: {e}");
            std::process::exit(1);
        }
    };

    info!("Backend channels: {backend_url}");
    println!();
    println!("  Tripleko gateway running on http://{}:{}", cli.hostname, server.port());
    println!("  Backend:   {backend_url}");
    println!("  Templates: {}", cli.templates.display());
    println!();
    println!("  Press Ctrl+C to stop.");
    println!();

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {e}");
    }

    println!("  Shutting down...");
    server.stop().await;
}
