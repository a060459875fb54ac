//! Bridge operation data model.
//!
//! # Data Flow
//! ```text
//! Sovereign shard
//!     → BridgeOperationBatch (groups of outgoing operations)
//!     → hasher.rs (recompute each group's hash of hashes)
//!     → relay formatter (register / execute payloads)
//! ```
//!
//! # Design Decisions
//! - Operations are immutable once received
//! - Byte fields travel as hex strings on the wire
//! - The hash algorithm is chosen once from configuration

pub mod hasher;
pub mod types;

pub use hasher::{hasher_from_name, Hasher};
pub use types::{
    BridgeOperationBatch, BridgeOperationBatchResponse, BridgeOperationGroup, OutgoingOperation,
};
