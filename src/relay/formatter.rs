//! Conversion of bridge operation batches into transaction payloads.

use alloy::hex;
use std::sync::Arc;
use tracing::Span;

use crate::bridge::{BridgeOperationBatch, BridgeOperationGroup, Hasher};
use crate::relay::payload::{
    TxPayload, ARGUMENTS_SEPARATOR, EXECUTE_BRIDGE_OPS_PREFIX, REGISTER_BRIDGE_OPS_PREFIX,
};

/// Turns a batch into the ordered payload list the sender relays.
pub trait DataFormatter: Send + Sync {
    fn create_txs_data(&self, batch: &BridgeOperationBatch) -> Vec<TxPayload>;
}

/// Formatter producing `registerBridgeOps` / `executeBridgeOps` payloads.
///
/// For every group, a register payload is emitted only when the claimed hash
/// matches the hash recomputed over the operation hashes; one execute payload
/// follows per operation regardless.
#[derive(Debug)]
pub struct BridgeDataFormatter {
    hasher: Arc<dyn Hasher>,
    span: Span,
}

impl BridgeDataFormatter {
    pub fn new(hasher: Arc<dyn Hasher>) -> Self {
        let span = tracing::debug_span!("formatter", hasher = hasher.name());
        Self { hasher, span }
    }

    fn register_payload(group: &BridgeOperationGroup) -> TxPayload {
        let mut data = String::from(REGISTER_BRIDGE_OPS_PREFIX);
        push_hex(&mut data, &group.aggregated_signature);
        push_hex(&mut data, &group.hash);
        for operation in &group.outgoing_operations {
            push_hex(&mut data, &operation.hash);
        }
        TxPayload::from(data)
    }

    fn execute_payload(group_hash: &[u8], operation_data: &[u8]) -> TxPayload {
        let mut data = String::from(EXECUTE_BRIDGE_OPS_PREFIX);
        push_hex(&mut data, group_hash);
        push_hex(&mut data, operation_data);
        TxPayload::from(data)
    }
}

fn push_hex(data: &mut String, bytes: &[u8]) {
    data.push(ARGUMENTS_SEPARATOR);
    data.push_str(&hex::encode(bytes));
}

impl DataFormatter for BridgeDataFormatter {
    fn create_txs_data(&self, batch: &BridgeOperationBatch) -> Vec<TxPayload> {
        let _entered = self.span.enter();
        let mut payloads = Vec::with_capacity(batch.groups.len() + batch.operation_count());

        for group in &batch.groups {
            tracing::debug!(
                hash = %hex::encode(&group.hash),
                operations = group.outgoing_operations.len(),
                "Formatting bridge operation group"
            );

            let computed = self.hasher.compute(&group.concatenated_hashes());
            if computed[..] == group.hash[..] {
                payloads.push(Self::register_payload(group));
            } else {
                tracing::debug!(
                    hash = %hex::encode(&group.hash),
                    "Hash of hashes differs, skipping register payload"
                );
            }

            for operation in &group.outgoing_operations {
                payloads.push(Self::execute_payload(&group.hash, &operation.data));
            }
        }

        payloads
    }
}
