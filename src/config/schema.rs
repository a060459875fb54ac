//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the bridge relay.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Wallet used to sign relayed transactions.
    pub wallet: WalletConfig,

    /// Transaction sender settings.
    pub sender: SenderConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Delay before restarting a failed listener, in milliseconds.
    pub serve_retry_delay_ms: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            wallet: WalletConfig::default(),
            sender: SenderConfig::default(),
            observability: ObservabilityConfig::default(),
            serve_retry_delay_ms: 1000,
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host to bind (e.g., "0.0.0.0").
    pub host: String,

    /// Port serving the relay endpoint.
    pub port: u16,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,

    /// Request timeout (whole batch relay) in seconds.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl ListenerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8085,
            tls: None,
            request_timeout_secs: 120,
            max_body_bytes: 4 * 1024 * 1024,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,

    /// CA bundle used to verify client certificates (PEM). Enables mutual TLS.
    #[serde(default)]
    pub client_ca_path: Option<String>,
}

/// Wallet key file location.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Path to the key file; the extension selects the format.
    pub path: String,

    /// Keystore password (unused for plain key files).
    pub password: String,
}

impl std::fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletConfig")
            .field("path", &self.path)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Transaction sender configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SenderConfig {
    /// Receiver of `registerBridgeOps` transactions.
    pub header_verifier_address: String,

    /// Receiver of `executeBridgeOps` transactions.
    pub safe_address: String,

    /// Chain gateway URL.
    pub proxy_url: String,

    /// Failover gateway URLs.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Gateway request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Minimum spacing between broadcasts in milliseconds.
    pub interval_to_send_ms: u64,

    /// Hash algorithm for the hash-of-hashes check.
    pub hasher: String,

    /// Gas limit applied to every relayed transaction.
    pub gas_limit: u64,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            header_verifier_address: String::new(),
            safe_address: String::new(),
            proxy_url: "http://localhost:8079".to_string(),
            failover_urls: Vec::new(),
            rpc_timeout_secs: 10,
            interval_to_send_ms: 100,
            hasher: "sha256".to_string(),
            gas_limit: 50_000_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,

    /// Serve the websocket log stream on `/log`.
    pub log_stream_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
            log_stream_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml() {
        let config: RelayConfig = toml::from_str(
            r#"
            [sender]
            header_verifier_address = "drt1header"
            safe_address = "drt1safe"
            "#,
        )
        .unwrap();

        assert_eq!(config.sender.header_verifier_address, "drt1header");
        assert_eq!(config.sender.gas_limit, 50_000_000);
        assert_eq!(config.listener.port, 8085);
        assert_eq!(config.serve_retry_delay_ms, 1000);
        assert!(config.listener.tls.is_none());
    }

    #[test]
    fn test_tls_section() {
        let config: RelayConfig = toml::from_str(
            r#"
            [listener]
            port = 9443

            [listener.tls]
            cert_path = "certs/server.crt"
            key_path = "certs/server.key"
            client_ca_path = "certs/ca.crt"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address(), "0.0.0.0:9443");
        let tls = config.listener.tls.as_ref().unwrap();
        assert_eq!(tls.cert_path, "certs/server.crt");
        assert_eq!(tls.client_ca_path.as_deref(), Some("certs/ca.crt"));
    }

    #[test]
    fn test_wallet_password_redacted() {
        let wallet = WalletConfig {
            path: "wallet.json".to_string(),
            password: "hunter2".to_string(),
        };
        let debug = format!("{:?}", wallet);
        assert!(debug.contains("wallet.json"));
        assert!(!debug.contains("hunter2"));
    }
}
