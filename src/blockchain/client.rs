//! Chain gateway client with timeout and failover handling.
//!
//! # Responsibilities
//! - Fetch the network configuration snapshot at startup
//! - Query account state (nonce) for the relaying wallet
//! - Broadcast signed transactions
//! - Try failover gateways in order when one is unreachable

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

use crate::blockchain::transaction::TransactionWire;
use crate::blockchain::types::{
    AccountInfo, BlockchainError, BlockchainResult, NetworkConfig, SenderConfig,
};

/// Gateway code for an accepted request.
pub const CODE_SUCCESSFUL: &str = "successful";

/// Read-only view of the destination chain plus transaction broadcast.
#[async_trait]
pub trait ChainProxy: Send + Sync {
    async fn network_config(&self) -> BlockchainResult<NetworkConfig>;

    async fn account(&self, address: &str) -> BlockchainResult<AccountInfo>;

    /// Broadcast one signed transaction and return its hash.
    async fn send_transaction(&self, tx: &TransactionWire) -> BlockchainResult<String>;
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    error: String,
    #[serde(default)]
    code: String,
}

#[derive(Debug, Deserialize)]
struct NetworkConfigData {
    config: GatewayNetworkConfig,
}

#[derive(Debug, Deserialize)]
struct GatewayNetworkConfig {
    #[serde(rename = "erd_chain_id", alias = "drt_chain_id")]
    chain_id: String,
    #[serde(rename = "erd_min_gas_price", alias = "drt_min_gas_price")]
    min_gas_price: u64,
    #[serde(
        rename = "erd_min_transaction_version",
        alias = "drt_min_transaction_version"
    )]
    min_transaction_version: u32,
}

#[derive(Debug, Deserialize)]
struct AccountData {
    account: AccountInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendData {
    tx_hash: String,
}

/// REST client for the chain gateway.
#[derive(Clone)]
pub struct GatewayClient {
    /// Primary gateway followed by failovers.
    urls: Vec<Url>,
    http: Client,
    timeout_duration: Duration,
}

impl GatewayClient {
    /// Create a new gateway client.
    ///
    /// An invalid primary URL is an error; invalid failover URLs are skipped.
    pub fn new(config: &SenderConfig) -> BlockchainResult<Self> {
        let primary: Url = config.proxy_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid gateway URL '{}': {}", config.proxy_url, e))
        })?;

        let mut urls = vec![primary];
        for url_str in &config.failover_urls {
            match url_str.parse() {
                Ok(url) => urls.push(url),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover gateway URL"),
            }
        }

        let http = Client::builder()
            .build()
            .map_err(|e| BlockchainError::Rpc(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            urls,
            http,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
        })
    }

    async fn call<T, F>(&self, path: &str, build: F) -> BlockchainResult<T>
    where
        T: DeserializeOwned,
        F: Fn(&Client, String) -> RequestBuilder,
    {
        let mut last_error = None;

        for (i, base) in self.urls.iter().enumerate() {
            let url = format!("{}/{}", base.as_str().trim_end_matches('/'), path);
            let request = build(&self.http, url);
            let fut = async move {
                let response = request.send().await?;
                let status = response.status();
                let body = response.text().await?;
                Ok::<_, reqwest::Error>((status, body))
            };

            match timeout(self.timeout_duration, fut).await {
                Ok(Ok((status, body))) => return decode_envelope(status, &body),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next gateway");
                    last_error = Some(BlockchainError::Rpc(format!(
                        "All gateways failed for {}: {}",
                        path, e
                    )));
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next gateway");
                    last_error = Some(BlockchainError::Timeout(self.timeout_duration.as_secs()));
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| BlockchainError::Rpc(format!("All gateways failed for {}", path))))
    }
}

/// Unwrap the gateway envelope, turning error codes into `Rejected`.
fn decode_envelope<T: DeserializeOwned>(status: StatusCode, body: &str) -> BlockchainResult<T> {
    let envelope: Envelope<T> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => {
            return Err(BlockchainError::Rpc(format!(
                "Invalid gateway response: {}",
                e
            )))
        }
        Err(_) => return Err(BlockchainError::Rpc(format!("HTTP {}: {}", status, body))),
    };

    match envelope.data {
        Some(data) if envelope.code == CODE_SUCCESSFUL => Ok(data),
        _ => Err(BlockchainError::Rejected {
            code: envelope.code,
            message: envelope.error,
        }),
    }
}

#[async_trait]
impl ChainProxy for GatewayClient {
    async fn network_config(&self) -> BlockchainResult<NetworkConfig> {
        let data: NetworkConfigData = self
            .call("network/config", |client, url| client.get(url))
            .await?;

        Ok(NetworkConfig {
            chain_id: data.config.chain_id,
            min_gas_price: data.config.min_gas_price,
            min_transaction_version: data.config.min_transaction_version,
        })
    }

    async fn account(&self, address: &str) -> BlockchainResult<AccountInfo> {
        let path = format!("address/{}", address);
        let data: AccountData = self.call(&path, |client, url| client.get(url)).await?;
        Ok(data.account)
    }

    async fn send_transaction(&self, tx: &TransactionWire) -> BlockchainResult<String> {
        let data: SendData = self
            .call("transaction/send", |client, url| client.post(url).json(tx))
            .await?;
        Ok(data.tx_hash)
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("urls", &self.urls)
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SenderConfig {
        SenderConfig {
            proxy_url: "http://127.0.0.1:1".to_string(),
            rpc_timeout_secs: 2,
            ..SenderConfig::default()
        }
    }

    #[test]
    fn test_invalid_primary_url() {
        let mut config = test_config();
        config.proxy_url = "not a url".to_string();
        let err = GatewayClient::new(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid gateway URL"));
    }

    #[test]
    fn test_invalid_failover_skipped() {
        let mut config = test_config();
        config.failover_urls = vec!["::bad::".to_string(), "http://127.0.0.1:2".to_string()];
        let client = GatewayClient::new(&config).unwrap();
        assert_eq!(client.urls.len(), 2);
    }

    #[tokio::test]
    async fn test_gateway_failover_exhausted() {
        let mut config = test_config();
        config.failover_urls.push("http://127.0.0.1:2".to_string());

        let client = GatewayClient::new(&config).unwrap();
        let result = client.network_config().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_dead_primary_fails_over() {
        use axum::{routing::get, Json, Router};

        let app = Router::new().route(
            "/network/config",
            get(|| async {
                Json(serde_json::json!({
                    "data": {"config": {
                        "erd_chain_id": "T",
                        "erd_min_gas_price": 1_000_000_000u64,
                        "erd_min_transaction_version": 2
                    }},
                    "error": "",
                    "code": "successful"
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let mut config = test_config();
        config.failover_urls.push(format!("http://{}", addr));

        let client = GatewayClient::new(&config).unwrap();
        let network = client.network_config().await.unwrap();
        assert_eq!(network.chain_id, "T");
        assert_eq!(network.min_transaction_version, 2);
    }

    #[test]
    fn test_decode_network_config() {
        let body = r#"{
            "data": {"config": {
                "erd_chain_id": "T",
                "erd_min_gas_price": 1000000000,
                "erd_min_transaction_version": 2,
                "erd_num_shards_without_meta": 3
            }},
            "error": "",
            "code": "successful"
        }"#;
        let data: NetworkConfigData = decode_envelope(StatusCode::OK, body).unwrap();
        assert_eq!(data.config.chain_id, "T");
        assert_eq!(data.config.min_gas_price, 1_000_000_000);
        assert_eq!(data.config.min_transaction_version, 2);
    }

    #[test]
    fn test_decode_rejected() {
        let body = r#"{"data": null, "error": "transaction generation failed: invalid nonce", "code": "bad_request"}"#;
        let err = decode_envelope::<SendData>(StatusCode::BAD_REQUEST, body).unwrap_err();
        match err {
            BlockchainError::Rejected { code, message } => {
                assert_eq!(code, "bad_request");
                assert!(message.contains("invalid nonce"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_decode_non_json_error() {
        let err = decode_envelope::<SendData>(StatusCode::BAD_GATEWAY, "upstream down").unwrap_err();
        assert!(err.to_string().contains("502"));
    }
}
