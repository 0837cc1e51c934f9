//! page-relay: a rewriting web proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌───────────────────────────────────────────────┐
//!                       │                  PAGE RELAY                    │
//!   GET /fetch?target=  │  ┌────────┐   ┌──────────┐   ┌─────────────┐  │
//!   ────────────────────┼─▶│  http  │──▶│ proxy/   │──▶│  upstream   │──┼──▶ site
//!                       │  │ server │   │ page     │   │  (buffered) │  │
//!                       │  └────────┘   └────┬─────┘   └─────────────┘  │
//!                       │                    ▼                          │
//!                       │              ┌──────────┐                     │
//!                       │              │ rewrite  │ links / srcset      │
//!                       │              └──────────┘                     │
//!   GET /res?url=       │  ┌────────┐   ┌──────────┐   ┌─────────────┐  │
//!   ────────────────────┼─▶│  http  │──▶│ proxy/   │──▶│  upstream   │──┼──▶ site
//!   ◀── streamed bytes ─┼──│ server │◀──│ resource │◀──│ (streamed)  │  │
//!                       │  └────────┘   └──────────┘   └─────────────┘  │
//!                       └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use page_relay::config::loader::{env_port, resolve_config};
use page_relay::lifecycle::{signals, Shutdown};
use page_relay::observability::{logging, metrics};
use page_relay::HttpServer;

#[derive(Parser)]
#[command(name = "page-relay")]
#[command(about = "Rewriting web proxy", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port; overrides the PORT environment variable and the config file.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref(), cli.port, env_port()?)?;

    logging::init(&config.observability);
    tracing::info!("page-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        user_agent = %config.upstream.user_agent,
        fetch_timeout_secs = config.upstream.fetch_timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_termination().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
