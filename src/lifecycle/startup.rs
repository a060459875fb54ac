//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the wallet and build the transaction sender
//! - Load TLS material
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listeners start last (traffic only when ready)

use axum_server::tls_rustls::RustlsConfig;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::blockchain::{BlockchainError, Wallet};
use crate::config::{ConfigError, RelayConfig};
use crate::http::{AppState, RelayInfo, RelayServer};
use crate::net::{load_tls_config, TlsError};
use crate::observability::LogBroadcaster;
use crate::relay::{create_tx_sender, RelayEndpoint, RelayError};
use crate::resilience::FixedBackoff;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to load wallet: {0}")]
    Wallet(#[source] BlockchainError),

    #[error("failed to create transaction sender: {0}")]
    Construction(#[from] RelayError),

    #[error("TLS error: {0}")]
    Tls(#[from] TlsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A fully wired relay, ready to serve.
pub struct Relay {
    server: RelayServer,
    info: RelayInfo,
    tls: Option<RustlsConfig>,
    bind_address: String,
    serve_retry_delay_ms: u64,
}

impl Relay {
    pub fn info(&self) -> &RelayInfo {
        &self.info
    }

    /// Serve until `shutdown` fires.
    pub async fn serve(self) -> Result<(), StartupError> {
        match self.tls {
            Some(tls) => {
                let addr = tokio::net::lookup_host(&self.bind_address)
                    .await?
                    .next()
                    .ok_or_else(|| {
                        std::io::Error::new(
                            std::io::ErrorKind::AddrNotAvailable,
                            format!("cannot resolve {}", self.bind_address),
                        )
                    })?;
                let backoff = FixedBackoff::from_millis(self.serve_retry_delay_ms);
                self.server.run_tls(addr, tls, backoff).await?;
            }
            None => {
                tracing::warn!("TLS not configured, serving plain HTTP");
                let listener = TcpListener::bind(&self.bind_address).await?;
                self.server.run(listener).await?;
            }
        }
        Ok(())
    }

    /// Serve plain HTTP on an already bound listener, ignoring any TLS settings.
    pub async fn serve_on(self, listener: TcpListener) -> Result<(), StartupError> {
        self.server.run(listener).await?;
        Ok(())
    }
}

/// Build every subsystem from `config`.
pub async fn build_relay(
    config: &RelayConfig,
    shutdown: CancellationToken,
    log_stream: Option<LogBroadcaster>,
) -> Result<Relay, StartupError> {
    let wallet = Wallet::load(&config.wallet).map_err(StartupError::Wallet)?;

    let sender = create_tx_sender(Arc::new(wallet), &config.sender).await?;
    let info = RelayInfo {
        address: sender.address().to_string(),
        chain_id: sender.network().chain_id.clone(),
    };

    let tls = config
        .listener
        .tls
        .as_ref()
        .map(load_tls_config)
        .transpose()?;

    let state = AppState {
        endpoint: RelayEndpoint::new(Arc::new(sender)),
        info: Arc::new(info.clone()),
        log_stream: log_stream.filter(|_| config.observability.log_stream_enabled),
        shutdown,
    };

    Ok(Relay {
        server: RelayServer::new(&config.listener, state),
        info,
        tls,
        bind_address: config.listener.bind_address(),
        serve_retry_delay_ms: config.serve_retry_delay_ms,
    })
}
