//! Bridge operation types received from the sovereign shard.

use alloy::primitives::Bytes;
use serde::{Deserialize, Serialize};

/// One elementary cross-chain instruction awaiting relay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingOperation {
    /// Content hash of the operation.
    pub hash: Bytes,
    /// Raw operation payload, forwarded as-is to the safe contract.
    pub data: Bytes,
}

impl OutgoingOperation {
    pub fn new(hash: impl Into<Bytes>, data: impl Into<Bytes>) -> Self {
        Self {
            hash: hash.into(),
            data: data.into(),
        }
    }
}

/// A group of operations sharing one claimed aggregate hash and signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeOperationGroup {
    /// Claimed hash of the concatenated operation hashes.
    pub hash: Bytes,
    /// Aggregated signature over `hash`, produced by the sovereign validators.
    pub aggregated_signature: Bytes,
    /// Operations in execution order.
    pub outgoing_operations: Vec<OutgoingOperation>,
}

impl BridgeOperationGroup {
    /// Concatenate every operation hash in list order.
    pub fn concatenated_hashes(&self) -> Vec<u8> {
        let total = self.outgoing_operations.iter().map(|op| op.hash.len()).sum();
        let mut hashes = Vec::with_capacity(total);
        for operation in &self.outgoing_operations {
            hashes.extend_from_slice(&operation.hash);
        }
        hashes
    }
}

/// Ordered sequence of groups relayed in one `Send` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeOperationBatch {
    #[serde(default)]
    pub groups: Vec<BridgeOperationGroup>,
}

impl BridgeOperationBatch {
    pub fn new(groups: Vec<BridgeOperationGroup>) -> Self {
        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of operations across all groups.
    pub fn operation_count(&self) -> usize {
        self.groups
            .iter()
            .map(|group| group.outgoing_operations.len())
            .sum()
    }
}

/// Transaction hashes produced for a batch, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeOperationBatchResponse {
    pub tx_hashes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_deserializes_hex_fields() {
        let json = r#"{
            "groups": [{
                "hash": "0xaabb",
                "aggregated_signature": "0x01",
                "outgoing_operations": [
                    {"hash": "0x0102", "data": "0xff"},
                    {"hash": "0304", "data": "0x"}
                ]
            }]
        }"#;

        let batch: BridgeOperationBatch = serde_json::from_str(json).unwrap();
        assert_eq!(batch.groups.len(), 1);
        assert_eq!(batch.operation_count(), 2);

        let group = &batch.groups[0];
        assert_eq!(group.hash.as_ref(), &[0xaa, 0xbb]);
        assert_eq!(group.outgoing_operations[1].hash.as_ref(), &[0x03, 0x04]);
        assert!(group.outgoing_operations[1].data.is_empty());
    }

    #[test]
    fn test_missing_groups_is_empty_batch() {
        let batch: BridgeOperationBatch = serde_json::from_str("{}").unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.operation_count(), 0);
    }

    #[test]
    fn test_missing_byte_fields_are_empty() {
        let json = r#"{"groups": [{"outgoing_operations": [{"data": "0x01"}, {}]}]}"#;

        let batch: BridgeOperationBatch = serde_json::from_str(json).unwrap();
        let group = &batch.groups[0];
        assert!(group.hash.is_empty());
        assert!(group.aggregated_signature.is_empty());
        assert!(group.outgoing_operations[0].hash.is_empty());
        assert_eq!(group.outgoing_operations[0].data.as_ref(), &[0x01]);
        assert_eq!(group.outgoing_operations[1], OutgoingOperation::default());
    }

    #[test]
    fn test_concatenated_hashes_preserve_order() {
        let group = BridgeOperationGroup {
            hash: Bytes::new(),
            aggregated_signature: Bytes::new(),
            outgoing_operations: vec![
                OutgoingOperation::new(vec![1, 2], vec![]),
                OutgoingOperation::new(vec![3], vec![]),
                OutgoingOperation::new(vec![4, 5], vec![]),
            ],
        };
        assert_eq!(group.concatenated_hashes(), vec![1, 2, 3, 4, 5]);
    }
}
