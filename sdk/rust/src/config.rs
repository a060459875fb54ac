//! Client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// PEM files for talking to a relay behind mutual TLS.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientTlsConfig {
    /// CA that signed the relay certificate.
    pub ca_cert_path: String,
    /// Client certificate and key presented to the relay.
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// A disabled client accepts every batch and relays nothing.
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub tls: Option<ClientTlsConfig>,
    /// Fixed delay between connection attempts.
    pub retry_delay_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "localhost".to_string(),
            port: 8085,
            tls: None,
            retry_delay_ms: 1000,
            request_timeout_secs: 120,
        }
    }
}

impl ClientConfig {
    pub fn base_url(&self) -> String {
        let scheme = if self.tls.is_some() { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_scheme() {
        let mut config = ClientConfig {
            host: "relay.internal".to_string(),
            port: 9443,
            ..ClientConfig::default()
        };
        assert_eq!(config.base_url(), "http://relay.internal:9443");

        config.tls = Some(ClientTlsConfig::default());
        assert_eq!(config.base_url(), "https://relay.internal:9443");
    }
}
