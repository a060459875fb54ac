//! Wire types of the relay's `POST /bridge/send` and `GET /health`.

use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingOperation {
    pub hash: Bytes,
    pub data: Bytes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeOperationGroup {
    /// Hash of the concatenated operation hashes.
    pub hash: Bytes,
    pub aggregated_signature: Bytes,
    pub outgoing_operations: Vec<OutgoingOperation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeOperationBatch {
    #[serde(default)]
    pub groups: Vec<BridgeOperationGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeOperationBatchResponse {
    #[serde(default)]
    pub tx_hashes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub address: String,
    pub chain_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
