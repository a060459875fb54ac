//! Transaction payloads produced from bridge operations.
//!
//! Payloads are ASCII: a function name followed by `@`-separated lowercase
//! hex operands.

use std::fmt;

/// Function called on the header verifier to register a group.
pub const REGISTER_BRIDGE_OPS_PREFIX: &str = "registerBridgeOps";
/// Function called on the safe contract to execute one operation.
pub const EXECUTE_BRIDGE_OPS_PREFIX: &str = "executeBridgeOps";
/// Operand separator.
pub const ARGUMENTS_SEPARATOR: char = '@';

/// Which contract a payload is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    Register,
    Execute,
}

impl PayloadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadKind::Register => "register",
            PayloadKind::Execute => "execute",
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque transaction data blob.
#[derive(Clone, PartialEq, Eq)]
pub struct TxPayload(Vec<u8>);

impl TxPayload {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self(data.into())
    }

    /// Classify by function-name prefix. `None` means the payload is malformed.
    pub fn kind(&self) -> Option<PayloadKind> {
        if self.0.starts_with(REGISTER_BRIDGE_OPS_PREFIX.as_bytes()) {
            Some(PayloadKind::Register)
        } else if self.0.starts_with(EXECUTE_BRIDGE_OPS_PREFIX.as_bytes()) {
            Some(PayloadKind::Execute)
        } else {
            None
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Debug for TxPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxPayload({})", String::from_utf8_lossy(&self.0))
    }
}

impl From<String> for TxPayload {
    fn from(value: String) -> Self {
        Self(value.into_bytes())
    }
}

impl From<&str> for TxPayload {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}
