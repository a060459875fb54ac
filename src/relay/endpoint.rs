//! Protocol-facing adapter between the transport and the sender.

use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::Span;

use crate::bridge::{BridgeOperationBatch, BridgeOperationBatchResponse};
use crate::relay::error::RelayResult;

/// Anything able to relay a whole batch.
#[async_trait]
pub trait BatchSender: Send + Sync {
    async fn send_batch(
        &self,
        batch: &BridgeOperationBatch,
        cancel: &CancellationToken,
    ) -> RelayResult<Vec<String>>;
}

/// Serves `Send` requests. No business logic of its own.
#[derive(Clone)]
pub struct RelayEndpoint {
    sender: Arc<dyn BatchSender>,
    span: Span,
}

impl RelayEndpoint {
    pub fn new(sender: Arc<dyn BatchSender>) -> Self {
        Self {
            sender,
            span: tracing::info_span!("relay_endpoint"),
        }
    }

    /// Relay `batch` and wrap the resulting hashes. Errors pass through untouched.
    pub async fn send(
        &self,
        batch: &BridgeOperationBatch,
        cancel: &CancellationToken,
    ) -> RelayResult<BridgeOperationBatchResponse> {
        let tx_hashes = self.sender.send_batch(batch, cancel).await?;

        self.span.in_scope(|| {
            for hash in &tx_hashes {
                tracing::info!(hash = %hash, "Sent tx");
            }
        });

        Ok(BridgeOperationBatchResponse { tx_hashes })
    }
}

impl std::fmt::Debug for RelayEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayEndpoint").finish_non_exhaustive()
    }
}
