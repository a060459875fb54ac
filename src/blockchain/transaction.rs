//! Transaction building and the signing/submission lifecycle.
//!
//! # States
//! ```text
//! Built ──assign_nonce──▶ Nonced ──into_signed──▶ Signed ──into_submitted──▶ Submitted
//! ```
//!
//! Each transition consumes the previous state, so a transaction cannot be
//! signed before it has a nonce or broadcast before it is signed.

use alloy::hex;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::blockchain::types::{BlockchainError, BlockchainResult, NetworkConfig};

/// Bridge transactions never move native value.
pub const ZERO_VALUE: &str = "0";

/// Freshly built skeleton: receiver, sender, data and network parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Built;

/// Nonce and gas price assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nonced;

/// Signature attached, ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signed {
    signature: String,
}

/// Accepted by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    signature: String,
    hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TxFields {
    nonce: u64,
    value: String,
    receiver: String,
    sender: String,
    gas_price: u64,
    gas_limit: u64,
    data: Vec<u8>,
    chain_id: String,
    version: u32,
}

/// A transaction tagged with its lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction<S> {
    fields: TxFields,
    state: S,
}

/// JSON form accepted by the chain gateway. `data` is base64, `signature` is hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionWire {
    pub nonce: u64,
    pub value: String,
    pub receiver: String,
    pub sender: String,
    pub gas_price: u64,
    pub gas_limit: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub signature: String,
    #[serde(rename = "chainID")]
    pub chain_id: String,
    pub version: u32,
}

impl TransactionWire {
    /// Decode the base64 data field.
    pub fn decoded_data(&self) -> BlockchainResult<Vec<u8>> {
        STANDARD
            .decode(&self.data)
            .map_err(|e| BlockchainError::Encoding(format!("Invalid base64 data: {}", e)))
    }
}

impl<S> Transaction<S> {
    pub fn nonce(&self) -> u64 {
        self.fields.nonce
    }

    pub fn value(&self) -> &str {
        &self.fields.value
    }

    pub fn receiver(&self) -> &str {
        &self.fields.receiver
    }

    pub fn sender(&self) -> &str {
        &self.fields.sender
    }

    pub fn gas_price(&self) -> u64 {
        self.fields.gas_price
    }

    pub fn gas_limit(&self) -> u64 {
        self.fields.gas_limit
    }

    pub fn data(&self) -> &[u8] {
        &self.fields.data
    }

    pub fn chain_id(&self) -> &str {
        &self.fields.chain_id
    }

    pub fn version(&self) -> u32 {
        self.fields.version
    }

    fn wire(&self, signature: &str) -> TransactionWire {
        TransactionWire {
            nonce: self.fields.nonce,
            value: self.fields.value.clone(),
            receiver: self.fields.receiver.clone(),
            sender: self.fields.sender.clone(),
            gas_price: self.fields.gas_price,
            gas_limit: self.fields.gas_limit,
            data: STANDARD.encode(&self.fields.data),
            signature: signature.to_string(),
            chain_id: self.fields.chain_id.clone(),
            version: self.fields.version,
        }
    }
}

impl Transaction<Built> {
    /// Fill nonce and gas price. Called by the nonce handler only.
    pub fn assign_nonce(self, nonce: u64, gas_price: u64) -> Transaction<Nonced> {
        let mut fields = self.fields;
        fields.nonce = nonce;
        fields.gas_price = gas_price;
        Transaction {
            fields,
            state: Nonced,
        }
    }
}

impl Transaction<Nonced> {
    /// Canonical bytes covered by the signature: the wire JSON without a signature field.
    pub fn signing_bytes(&self) -> BlockchainResult<Vec<u8>> {
        serde_json::to_vec(&self.wire(""))
            .map_err(|e| BlockchainError::Encoding(format!("Failed to encode transaction: {}", e)))
    }

    pub fn into_signed(self, signature: &[u8]) -> Transaction<Signed> {
        Transaction {
            fields: self.fields,
            state: Signed {
                signature: hex::encode(signature),
            },
        }
    }
}

impl Transaction<Signed> {
    pub fn signature(&self) -> &str {
        &self.state.signature
    }

    pub fn to_wire(&self) -> TransactionWire {
        self.wire(&self.state.signature)
    }

    pub fn into_submitted(self, hash: String) -> Transaction<Submitted> {
        Transaction {
            fields: self.fields,
            state: Submitted {
                signature: self.state.signature,
                hash,
            },
        }
    }
}

impl Transaction<Submitted> {
    pub fn signature(&self) -> &str {
        &self.state.signature
    }

    pub fn hash(&self) -> &str {
        &self.state.hash
    }

    pub fn into_hash(self) -> String {
        self.state.hash
    }
}

/// Builds transaction skeletons from the network snapshot taken at startup.
#[derive(Debug, Clone)]
pub struct TxBuilder {
    sender: String,
    network: NetworkConfig,
    gas_limit: u64,
}

impl TxBuilder {
    /// Create a new transaction builder.
    ///
    /// # Arguments
    /// * `sender` - Address of the relaying wallet
    /// * `network` - Network configuration snapshot
    /// * `gas_limit` - Gas limit applied to every bridge transaction
    pub fn new(sender: String, network: NetworkConfig, gas_limit: u64) -> Self {
        Self {
            sender,
            network,
            gas_limit,
        }
    }

    /// Build a zero-value transaction carrying `data` to `receiver`.
    pub fn build(&self, receiver: &str, data: Vec<u8>) -> Transaction<Built> {
        Transaction {
            fields: TxFields {
                nonce: 0,
                value: ZERO_VALUE.to_string(),
                receiver: receiver.to_string(),
                sender: self.sender.clone(),
                gas_price: self.network.min_gas_price,
                gas_limit: self.gas_limit,
                data,
                chain_id: self.network.chain_id.clone(),
                version: self.network.min_transaction_version,
            },
            state: Built,
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> TxBuilder {
        TxBuilder::new(
            "drt1sender".to_string(),
            NetworkConfig {
                chain_id: "T".to_string(),
                min_gas_price: 1_000_000_000,
                min_transaction_version: 2,
            },
            50_000_000,
        )
    }

    #[test]
    fn test_build_skeleton() {
        let tx = builder().build("drt1receiver", b"executeBridgeOps@aa".to_vec());

        assert_eq!(tx.nonce(), 0);
        assert_eq!(tx.value(), "0");
        assert_eq!(tx.receiver(), "drt1receiver");
        assert_eq!(tx.sender(), "drt1sender");
        assert_eq!(tx.gas_price(), 1_000_000_000);
        assert_eq!(tx.gas_limit(), 50_000_000);
        assert_eq!(tx.data(), b"executeBridgeOps@aa");
        assert_eq!(tx.chain_id(), "T");
        assert_eq!(tx.version(), 2);
    }

    #[test]
    fn test_lifecycle() {
        let tx = builder()
            .build("drt1receiver", b"data".to_vec())
            .assign_nonce(7, 1_500_000_000);
        assert_eq!(tx.nonce(), 7);
        assert_eq!(tx.gas_price(), 1_500_000_000);

        let tx = tx.into_signed(&[0xde, 0xad]);
        assert_eq!(tx.signature(), "dead");

        let wire = tx.to_wire();
        assert_eq!(wire.nonce, 7);
        assert_eq!(wire.signature, "dead");
        assert_eq!(wire.decoded_data().unwrap(), b"data");

        let tx = tx.into_submitted("txhash".to_string());
        assert_eq!(tx.hash(), "txhash");
        assert_eq!(tx.signature(), "dead");
        assert_eq!(tx.into_hash(), "txhash");
    }

    #[test]
    fn test_signing_bytes_exclude_signature() {
        let tx = builder()
            .build("drt1receiver", b"data".to_vec())
            .assign_nonce(1, 1_000_000_000);

        let bytes = tx.signing_bytes().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert!(json.get("signature").is_none());
        assert_eq!(json["chainID"], "T");
        assert_eq!(json["gasLimit"], 50_000_000);
        assert_eq!(json["data"], STANDARD.encode(b"data"));
    }
}
