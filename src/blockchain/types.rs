//! Chain-specific types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export SenderConfig from config module to avoid duplication
pub use crate::config::schema::SenderConfig;

/// Network parameters captured once at startup and trusted for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Chain identifier included in every transaction.
    pub chain_id: String,
    /// Gas price floor accepted by the network.
    pub min_gas_price: u64,
    /// Transaction version accepted by the network.
    pub min_transaction_version: u32,
}

/// Account state as reported by the chain gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub address: String,
    pub nonce: u64,
    #[serde(default)]
    pub balance: String,
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// Gateway connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Gateway request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Gateway answered with an error code.
    #[error("Gateway rejected request ({code}): {message}")]
    Rejected { code: String, message: String },

    /// Invalid key file or key derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Key file extension is not a supported wallet type.
    #[error("Invalid/unknown wallet type '{kind}', acceptable: {acceptable}")]
    UnknownWalletType { kind: String, acceptable: String },

    /// Nonce management error.
    #[error("Nonce error: {0}")]
    Nonce(String),

    /// Signing failed.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Transaction could not be encoded for signing or broadcast.
    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;
