//! Wallet loading and transaction signing.
//!
//! # Security
//! - Key material is read from the configured key file only
//! - Keys and passwords are never logged or serialized

use alloy::hex;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::config::schema::WalletConfig;

/// PEM file whose block body is the base64 of the hex-encoded key.
pub const WALLET_TYPE_PEM: &str = "pem";
/// Encrypted JSON keystore.
pub const WALLET_TYPE_JSON: &str = "json";

const PRIVATE_KEY_LEN: usize = 32;

/// Signing identity used for every relayed transaction.
#[async_trait]
pub trait TxSigner: Send + Sync {
    /// Address transactions are sent from.
    fn address(&self) -> &str;

    /// Sign the canonical transaction bytes.
    async fn sign(&self, payload: &[u8]) -> BlockchainResult<Vec<u8>>;
}

/// Wallet backed by a local private key.
#[derive(Debug, Clone)]
pub struct Wallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
    /// Cached string form of the signer address.
    address: String,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        Ok(Self::from_signer(signer))
    }

    /// Load the wallet described by `config`, picking the format from the file extension.
    pub fn load(config: &WalletConfig) -> BlockchainResult<Self> {
        let path = Path::new(&config.path);
        let wallet = match wallet_type(path).as_str() {
            WALLET_TYPE_JSON => {
                let signer = PrivateKeySigner::decrypt_keystore(path, &config.password).map_err(
                    |e| BlockchainError::Wallet(format!("Failed to decrypt keystore: {}", e)),
                )?;
                Self::from_signer(signer)
            }
            WALLET_TYPE_PEM => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    BlockchainError::Wallet(format!(
                        "Failed to read PEM file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Self::from_pem(&content)?
            }
            other => {
                return Err(BlockchainError::UnknownWalletType {
                    kind: other.to_string(),
                    acceptable: format!("{}, {}", WALLET_TYPE_PEM, WALLET_TYPE_JSON),
                })
            }
        };

        tracing::info!(
            address = %wallet.address,
            path = %path.display(),
            "Wallet loaded"
        );

        Ok(wallet)
    }

    /// Read the key from the first PEM block in `content`.
    ///
    /// The block body decodes to the hex-encoded key, optionally followed by
    /// the public key; only the leading 32 bytes are used.
    pub fn from_pem(content: &str) -> BlockchainResult<Self> {
        let body: String = content
            .lines()
            .map(str::trim)
            .skip_while(|line| !line.starts_with("-----BEGIN"))
            .skip(1)
            .take_while(|line| !line.starts_with("-----END"))
            .collect();
        if body.is_empty() {
            return Err(BlockchainError::Wallet("No PEM block found".to_string()));
        }

        let decoded = STANDARD
            .decode(body.as_bytes())
            .map_err(|e| BlockchainError::Wallet(format!("Invalid PEM body: {}", e)))?;
        let key = match std::str::from_utf8(&decoded) {
            Ok(text) if is_hex(text.trim()) => hex::decode(text.trim())
                .map_err(|e| BlockchainError::Wallet(format!("Invalid PEM key: {}", e)))?,
            _ => decoded,
        };
        if key.len() < PRIVATE_KEY_LEN {
            return Err(BlockchainError::Wallet(format!(
                "PEM key too short: {} bytes",
                key.len()
            )));
        }

        Self::from_private_key(&hex::encode(&key[..PRIVATE_KEY_LEN]))
    }

    fn from_signer(signer: PrivateKeySigner) -> Self {
        let address = signer.address().to_string();
        Self { signer, address }
    }

    /// Sign arbitrary message bytes (with Ethereum prefix).
    pub async fn sign_message(&self, message: &[u8]) -> BlockchainResult<alloy::signers::Signature> {
        self.signer
            .sign_message(message)
            .await
            .map_err(|e| BlockchainError::Signing(format!("Message signing failed: {}", e)))
    }
}

#[async_trait]
impl TxSigner for Wallet {
    fn address(&self) -> &str {
        &self.address
    }

    async fn sign(&self, payload: &[u8]) -> BlockchainResult<Vec<u8>> {
        let signature = self.sign_message(payload).await?;
        Ok(signature.as_bytes().to_vec())
    }
}

fn is_hex(text: &str) -> bool {
    !text.is_empty() && text.len() % 2 == 0 && text.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Lowercased file extension, empty when the path has none.
fn wallet_type(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default()
}
