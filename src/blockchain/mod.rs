//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Key file (json keystore / hex key)
//!     → wallet.rs (key loading, signing)
//!     → client.rs (gateway REST calls with timeouts and failover)
//!     → transaction.rs (Built → Nonced → Signed → Submitted)
//!     → nonce.rs (nonce assignment, broadcast)
//! ```
//!
//! # Security Constraints
//! - Never log private keys, passwords or signatures
//! - All gateway calls have configurable timeouts
//! - Network configuration is fetched once and never refreshed

pub mod client;
pub mod nonce;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{ChainProxy, GatewayClient};
pub use nonce::{AccountNonceHandler, NonceSender};
pub use transaction::{Transaction, TransactionWire, TxBuilder};
pub use types::{AccountInfo, BlockchainError, BlockchainResult, NetworkConfig};
pub use wallet::{TxSigner, Wallet};
