//! Bridge transaction relay.
//!
//! Receives bridge operation batches from the sovereign shard and relays them
//! to the main chain as `registerBridgeOps` / `executeBridgeOps` transactions
//! signed by a single wallet.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌───────────────────────────────────────────────────┐
//!                   │                   BRIDGE RELAY                    │
//!   POST            │  ┌─────────┐   ┌──────────┐   ┌──────────────┐    │
//!   /bridge/send ───┼─▶│  http   │──▶│  relay   │──▶│  formatter   │    │
//!   (mTLS)          │  │ server  │   │ endpoint │   │ batch→payload│    │
//!                   │  └─────────┘   └────┬─────┘   └──────────────┘    │
//!                   │                     │                             │
//!                   │                     ▼                             │
//!                   │               ┌──────────┐   ┌──────────────┐     │    Chain
//!                   │               │ sender   │──▶│ nonce / sign │─────┼──▶ gateway
//!                   │               │ (locked) │   │  / broadcast │     │
//!                   │               └──────────┘   └──────────────┘     │
//!                   │                                                   │
//!                   │  config · observability · lifecycle · resilience  │
//!                   └───────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use bridge_relay::config::load_config;
use bridge_relay::lifecycle::{build_relay, spawn_signal_handler, Shutdown};
use bridge_relay::observability::{init_logging, metrics, LogBroadcaster, LoggingOptions};

#[derive(Parser, Debug)]
#[command(name = "bridge-relay")]
#[command(about = "Relays sovereign bridge operations to the main chain", long_about = None)]
struct Cli {
    /// TOML configuration file; environment variables override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level directive, e.g. `info` or `bridge_relay=debug`. Defaults to
    /// `observability.log_level` from the configuration.
    #[arg(long)]
    log_level: Option<String>,

    /// Also write logs to files in `--logs-dir`.
    #[arg(long)]
    log_save: bool,

    #[arg(long, default_value = "logs")]
    logs_dir: PathBuf,

    /// Disable colored console output.
    #[arg(long)]
    disable_ansi: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    let log_stream = LogBroadcaster::new();
    let _log_guard = init_logging(
        &LoggingOptions {
            level: cli
                .log_level
                .clone()
                .unwrap_or_else(|| config.observability.log_level.clone()),
            save_to_file: cli.log_save,
            logs_dir: cli.logs_dir.clone(),
            ansi: !cli.disable_ansi,
        },
        Some(log_stream.clone()),
    )?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "bridge-relay starting");

    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address(),
        tls = config.listener.tls.is_some(),
        gateway = %config.sender.proxy_url,
        hasher = %config.sender.hasher,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    spawn_signal_handler(shutdown.clone());

    let relay = build_relay(&config, shutdown.token(), Some(log_stream)).await?;
    tracing::info!(
        address = %relay.info().address,
        chain_id = %relay.info().chain_id,
        "Relay ready"
    );

    relay.serve().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
