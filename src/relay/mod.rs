//! Bridge transaction relay.
//!
//! # Data Flow
//! ```text
//! BridgeOperationBatch
//!     → endpoint.rs (protocol adapter, logs tx hashes)
//!     → sender.rs (per payload: classify, build, then under the account lock
//!                  nonce → sign → broadcast)
//!         → formatter.rs (batch → ordered payloads, hash-of-hashes check)
//!     → tx hashes in submission order
//! ```
//!
//! # Design Decisions
//! - All collaborators are checked when the sender is built, never later
//! - Any nonce, signing or broadcast error aborts the whole batch
//! - Malformed payloads are the only per-item errors tolerated

pub mod endpoint;
pub mod error;
pub mod factory;
pub mod formatter;
pub mod payload;
pub mod sender;

pub use endpoint::{BatchSender, RelayEndpoint};
pub use error::{ConstructionError, RelayError, RelayResult};
pub use factory::create_tx_sender;
pub use formatter::{BridgeDataFormatter, DataFormatter};
pub use payload::{PayloadKind, TxPayload};
pub use sender::{AccountLocks, TxSender, TxSenderBuilder};
