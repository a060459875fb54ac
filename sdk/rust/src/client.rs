//! Clients for the relay's `Send` call.

use async_trait::async_trait;
use reqwest::{Certificate, Client, Identity};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::connection::{Connection, ConnectionState, Probe};
use crate::error::{ClientError, ClientResult};
use crate::types::{BridgeOperationBatch, BridgeOperationBatchResponse, ErrorBody, HealthStatus};

/// Something that can hand batches to the relay.
#[async_trait]
pub trait ClientHandler: Send + Sync {
    async fn send(&self, batch: &BridgeOperationBatch) -> ClientResult<BridgeOperationBatchResponse>;

    /// Stop pending connection attempts.
    fn close(&self);
}

/// Client used when relaying is switched off; every call succeeds with no hashes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledClient;

#[async_trait]
impl ClientHandler for DisabledClient {
    async fn send(&self, _batch: &BridgeOperationBatch) -> ClientResult<BridgeOperationBatchResponse> {
        Ok(BridgeOperationBatchResponse::default())
    }

    fn close(&self) {}
}

/// Probes `GET /health`.
pub struct HealthProbe {
    http: Client,
    url: String,
}

#[async_trait]
impl Probe for HealthProbe {
    async fn probe(&self) -> ClientResult<()> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Relay {
                status: status.as_u16(),
                message: "health check failed".to_string(),
            });
        }
        let health: HealthStatus = response.json().await?;
        tracing::debug!(address = %health.address, chain_id = %health.chain_id, "Relay healthy");
        Ok(())
    }
}

/// HTTP(S) client for a relay.
pub struct HttpClient {
    http: Client,
    send_url: String,
    connection: Connection<HealthProbe>,
    cancel: CancellationToken,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .no_proxy();

        if let Some(tls) = &config.tls {
            let ca = std::fs::read(&tls.ca_cert_path)?;
            builder = builder
                .use_rustls_tls()
                .tls_built_in_root_certs(false)
                .add_root_certificate(Certificate::from_pem(&ca)?);

            match (&tls.cert_path, &tls.key_path) {
                (Some(cert), Some(key)) => {
                    let mut pem = std::fs::read(cert)?;
                    pem.push(b'\n');
                    pem.extend(std::fs::read(key)?);
                    builder = builder.identity(Identity::from_pem(&pem)?);
                }
                (None, None) => {}
                _ => {
                    return Err(ClientError::Config(
                        "client certificate and key must be set together".to_string(),
                    ))
                }
            }
        }

        let http = builder.build()?;
        let base_url = config.base_url();
        let probe = HealthProbe {
            http: http.clone(),
            url: format!("{}/health", base_url),
        };

        Ok(Self {
            http,
            send_url: format!("{}/bridge/send", base_url),
            connection: Connection::new(probe, config.retry_delay()),
            cancel: CancellationToken::new(),
        })
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn connection(&self) -> &Connection<HealthProbe> {
        &self.connection
    }

    /// Block until the relay answers its health probe.
    pub async fn connect(&self) -> ClientResult<()> {
        self.connection.establish(&self.cancel).await
    }
}

#[async_trait]
impl ClientHandler for HttpClient {
    async fn send(&self, batch: &BridgeOperationBatch) -> ClientResult<BridgeOperationBatchResponse> {
        self.connect().await?;

        let response = match self.http.post(&self.send_url).json(batch).send().await {
            Ok(response) => response,
            Err(e) => {
                self.connection.mark_disconnected();
                return Err(e.into());
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await?;
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        Err(ClientError::Relay {
            status: status.as_u16(),
            message,
        })
    }

    fn close(&self) {
        self.cancel.cancel();
    }
}

/// Build the client described by `config`, waiting for the relay when enabled.
pub async fn create_client(config: &ClientConfig) -> ClientResult<Arc<dyn ClientHandler>> {
    if !config.enabled {
        tracing::info!("Relay client disabled");
        return Ok(Arc::new(DisabledClient));
    }

    let client = HttpClient::new(config)?;
    client.connect().await?;
    Ok(Arc::new(client))
}
