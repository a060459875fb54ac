//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Check that required addresses and the gateway URL are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Wallet files are checked when loaded, not here

use url::Url;

use crate::bridge::hasher_from_name;
use crate::config::schema::RelayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check a loaded configuration, collecting every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::new("listener.port", "must be non-zero"));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "listener.request_timeout_secs",
            "must be greater than zero",
        ));
    }
    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.is_empty() {
            errors.push(ValidationError::new("listener.tls.cert_path", "must not be empty"));
        }
        if tls.key_path.is_empty() {
            errors.push(ValidationError::new("listener.tls.key_path", "must not be empty"));
        }
    }

    let sender = &config.sender;
    if sender.header_verifier_address.is_empty() {
        errors.push(ValidationError::new(
            "sender.header_verifier_address",
            "must not be empty",
        ));
    }
    if sender.safe_address.is_empty() {
        errors.push(ValidationError::new("sender.safe_address", "must not be empty"));
    }
    if let Err(e) = Url::parse(&sender.proxy_url) {
        errors.push(ValidationError::new(
            "sender.proxy_url",
            format!("invalid URL '{}': {}", sender.proxy_url, e),
        ));
    }
    if sender.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "sender.rpc_timeout_secs",
            "must be greater than zero",
        ));
    }
    if sender.gas_limit == 0 {
        errors.push(ValidationError::new("sender.gas_limit", "must be greater than zero"));
    }
    if let Err(e) = hasher_from_name(&sender.hasher) {
        errors.push(ValidationError::new("sender.hasher", e.to_string()));
    }

    if config.wallet.path.is_empty() {
        errors.push(ValidationError::new("wallet.path", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::TlsConfig;

    fn valid_config() -> RelayConfig {
        let mut config = RelayConfig::default();
        config.wallet.path = "relayer.pem".to_string();
        config.sender.header_verifier_address = "drt1header".to_string();
        config.sender.safe_address = "drt1safe".to_string();
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_default_config_reports_all_missing_fields() {
        let errors = validate_config(&RelayConfig::default()).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"sender.header_verifier_address"));
        assert!(fields.contains(&"sender.safe_address"));
        assert!(fields.contains(&"wallet.path"));
    }

    #[test]
    fn test_unknown_hasher() {
        let mut config = valid_config();
        config.sender.hasher = "md5".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "sender.hasher");
    }

    #[test]
    fn test_supported_hashers() {
        for name in ["sha256", "keccak", "blake2b"] {
            let mut config = valid_config();
            config.sender.hasher = name.to_string();
            assert!(validate_config(&config).is_ok(), "{} rejected", name);
        }
    }

    #[test]
    fn test_half_configured_tls() {
        let mut config = valid_config();
        config.listener.tls = Some(TlsConfig {
            cert_path: "server.crt".to_string(),
            ..TlsConfig::default()
        });
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "listener.tls.key_path");
    }

    #[test]
    fn test_bad_values() {
        let mut config = valid_config();
        config.listener.port = 0;
        config.sender.proxy_url = "localhost without scheme".to_string();
        config.sender.rpc_timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
