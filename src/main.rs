//! Locale-aware edge gate (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                    EDGE GATE                     │
//!   Client Request    │  ┌─────────┐   ┌───────────────┐   ┌──────────┐  │
//!   ──────────────────┼─▶│  http   │──▶│  gate layer   │──▶│ forward  │──┼──▶ Frontend
//!                     │  │ server  │   │ (EdgeRouter)  │   │ handler  │  │
//!                     │  └─────────┘   └───────┬───────┘   └──────────┘  │
//!   307 Redirect      │                        │                          │
//!   ◀─────────────────┼────────────────────────┘                          │
//!                     │  ┌────────────────────────────────────────────┐  │
//!                     │  │ config + watcher │ observability │ admin   │  │
//!                     │  └────────────────────────────────────────────┘  │
//!                     └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use edge_gate::config::{load_config, watcher::ConfigWatcher, GateConfig};
use edge_gate::http::HttpServer;
use edge_gate::lifecycle::{signals, Shutdown};
use edge_gate::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "edge-gate")]
#[command(about = "Locale-aware authentication gate for the web frontend", long_about = None)]
struct Args {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long, env = "EDGE_GATE_CONFIG")]
    config: Option<PathBuf>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GateConfig::default(),
    };

    if args.check {
        println!("configuration OK");
        return Ok(());
    }

    logging::init(&config.observability);
    tracing::info!("edge-gate v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        locales = ?config.locales.locales,
        default_locale = %config.locales.default_locale,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // The watcher handle must outlive the server for reloads to keep flowing.
    let (config_updates, _watcher) = match &args.config {
        Some(path) => {
            let (watcher, rx) = ConfigWatcher::new(path);
            match watcher.run() {
                Ok(handle) => (rx, Some(handle)),
                Err(e) => {
                    tracing::warn!(error = %e, "Config hot reload disabled");
                    (mpsc::unbounded_channel().1, None)
                }
            }
        }
        None => (mpsc::unbounded_channel().1, None),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config);

    tokio::spawn(async move {
        signals::wait_for_shutdown().await;
        shutdown.trigger();
    });

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
