//! Web service entry point.
//!
//! # Startup
//!
//! ```text
//!   CLI flags ──▶ config (file or defaults, env overrides, validation)
//!                   │
//!                   ▼
//!               logging / metrics
//!                   │
//!                   ▼
//!   ┌─────────────────────────────────────────────┐
//!   │ Server                                      │
//!   │   AppContext: config, database, cache       │
//!   │   HttpServer: routes ─▶ AppContext          │
//!   └─────────────────────────────────────────────┘
//!          │ start (spawned)         │ graceful_shutdown (main task)
//!          ▼                         ▼
//!      serve until drained      SIGINT → cache → database → HTTP
//! ```
//!
//! A failed shutdown step is logged and the process exits with status 1.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use web_core::config::{load_config, load_from_env};
use web_core::lifecycle::signals;
use web_core::observability::{logging, metrics};
use web_core::Server;

#[derive(Parser)]
#[command(name = "web-core")]
#[command(about = "Web service with ordered graceful shutdown", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen address (host:port).
    #[arg(short, long)]
    address: Option<String>,

    /// Serve the assets build directory at `/`.
    #[arg(long)]
    serve_static: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_from_env()?,
    };
    if let Some(address) = cli.address {
        config.server.address = address;
    }
    config.server.serve_static |= cli.serve_static;

    logging::init_logging(&config.observability)?;

    tracing::info!("web-core v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        address = %config.server.address,
        assets_build_dir = %config.assets_build_dir,
        shutdown_timeout_secs = config.shutdown.timeout_secs,
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

    let address = config.server.address.clone();
    let serve_static = config.server.serve_static;
    let database_required = config.database.required;

    let (server, database_error) = Server::new(config).await;
    if let Some(e) = database_error {
        if database_required {
            return Err(e.into());
        }
        tracing::warn!("Continuing without a database connection");
    }

    let server = Arc::new(server);
    if serve_static {
        server.serve_static_files();
    }

    let mut listener = {
        let server = server.clone();
        tokio::spawn(async move { server.start(&address).await })
    };

    tokio::select! {
        result = &mut listener => {
            // The listener ended on its own, before any interrupt.
            result??;
            return Ok(());
        }
        result = server.graceful_shutdown(signals::interrupt()) => {
            if let Err(e) = result {
                tracing::error!(step = e.step().as_str(), error = %e, "Shutdown failed");
                std::process::exit(1);
            }
        }
    }

    listener.await??;
    tracing::info!("Shutdown complete");
    Ok(())
}
