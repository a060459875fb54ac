//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{RelayConfig, TlsConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from an optional TOML file, apply process environment
/// overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => RelayConfig::default(),
    };

    let mut errors = apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    if let Err(validation) = validate_config(&config) {
        errors.extend(validation);
    }
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    Ok(config)
}

/// Overlay environment values onto `config`.
///
/// `lookup` resolves a variable name; unset or empty variables leave the
/// field untouched. Unparsable numeric values are reported, not ignored.
/// `GRPC_PORT`, `DCDT_SAFE_SC_ADDRESS` and `DHARITRI_PROXY` are accepted when
/// the corresponding primary name is unset.
pub fn apply_env_overrides<F>(config: &mut RelayConfig, lookup: F) -> Vec<ValidationError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
    let first = |keys: &[&'static str]| {
        keys.iter()
            .find_map(|key| get(key).map(|value| (*key, value)))
    };
    let mut errors = Vec::new();

    if let Some((key, port)) = first(&["RELAY_PORT", "GRPC_PORT"]) {
        match port.parse() {
            Ok(port) => config.listener.port = port,
            Err(_) => errors.push(ValidationError::new(key, "must be a port number")),
        }
    }
    if let Some(path) = get("WALLET_PATH") {
        config.wallet.path = path;
    }
    if let Some(password) = get("WALLET_PASSWORD") {
        config.wallet.password = password;
    }
    if let Some(address) = get("HEADER_VERIFIER_SC_ADDRESS") {
        config.sender.header_verifier_address = address;
    }
    if let Some((_, address)) = first(&["SAFE_SC_ADDRESS", "DCDT_SAFE_SC_ADDRESS"]) {
        config.sender.safe_address = address;
    }
    if let Some((_, url)) = first(&["CHAIN_PROXY", "DHARITRI_PROXY"]) {
        config.sender.proxy_url = url;
    }
    if let Some(interval) = get("INTERVAL_TO_SEND") {
        match interval.parse() {
            Ok(ms) => config.sender.interval_to_send_ms = ms,
            Err(_) => errors.push(ValidationError::new(
                "INTERVAL_TO_SEND",
                "must be a number of milliseconds",
            )),
        }
    }
    if let Some(hasher) = get("HASHER") {
        config.sender.hasher = hasher;
    }

    let cert = get("CERT_FILE");
    let key = get("CERT_PK_FILE");
    let client_ca = get("CLIENT_CA_FILE");
    if cert.is_some() || key.is_some() || client_ca.is_some() {
        let tls = config.listener.tls.get_or_insert_with(TlsConfig::default);
        if let Some(cert) = cert {
            tls.cert_path = cert;
        }
        if let Some(key) = key {
            tls.key_path = key;
        }
        if client_ca.is_some() {
            tls.client_ca_path = client_ca;
        }
    }

    errors
}
