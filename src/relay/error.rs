//! Relay error types.

use thiserror::Error;

use crate::blockchain::BlockchainError;

/// Problems detected while assembling a [`TxSender`](crate::relay::TxSender).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("missing wallet signer")]
    MissingSigner,

    #[error("missing chain proxy")]
    MissingProxy,

    #[error("missing nonce sender")]
    MissingNonceSender,

    #[error("missing data formatter")]
    MissingFormatter,

    #[error("empty header verifier address")]
    EmptyHeaderVerifierAddress,

    #[error("empty safe address")]
    EmptySafeAddress,

    #[error("unknown hasher '{0}'")]
    UnknownHasher(String),
}

/// Errors returned by a batch relay.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    /// The caller's cancellation fired before the batch completed.
    #[error("batch relay cancelled")]
    Cancelled,

    #[error("invalid sender construction: {0}")]
    Construction(#[from] ConstructionError),
}

pub type RelayResult<T> = Result<T, RelayError>;
