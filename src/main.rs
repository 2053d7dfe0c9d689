//! CRM submission validation service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Submission              ┌──────────────────────────────────────────────┐
//!     ────────────────────────┼─▶ http::server ──▶ http::input               │
//!                             │                       │                      │
//!                             │                       ▼                      │
//!                             │               validation::validator ◀── lookup
//!                             │                       │                      │
//!                             │                       ▼                      │
//!     Response                │               http::negotiate                │
//!     ◀───────────────────────┼── 201 / 422 JSON / 303 back (+ flash)        │
//!                             │                                              │
//!                             │  config (TOML + social links) · observability│
//!                             │  lifecycle (shutdown)                        │
//!                             └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use crm_requests::config::validation::validate_config;
use crm_requests::config::{load_config, AppConfig, ConfigError, SocialLinks};
use crm_requests::http::{AppState, HttpServer};
use crm_requests::lifecycle::{signals, Shutdown};
use crm_requests::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "crm-requests")]
#[command(about = "Validation service for CRM client, deal and communication submissions", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init(&config.observability)?;

    tracing::info!("crm-requests v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_path = ?cli.config,
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let links = SocialLinks::from_env();
    let state = AppState::from_config(&config, links)?;

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let signal = shutdown.signal();
    signals::spawn_ctrl_c_handler(shutdown.clone());

    HttpServer::new(config, state).run(listener, signal).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
