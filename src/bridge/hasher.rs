//! Hash algorithms used for the hash-of-hashes integrity check.

use std::fmt::Debug;
use std::sync::Arc;

use alloy::primitives::keccak256;
use blake2::digest::consts::U32;
use blake2::Blake2b;
use sha2::{Digest, Sha256};
use thiserror::Error;

pub const SHA256: &str = "sha256";
pub const KECCAK: &str = "keccak";
pub const BLAKE2B: &str = "blake2b";

type Blake2b256 = Blake2b<U32>;

/// Hash function applied to raw bytes.
pub trait Hasher: Debug + Send + Sync {
    fn compute(&self, data: &[u8]) -> Vec<u8>;

    /// Identifier used in configuration.
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    fn compute(&self, data: &[u8]) -> Vec<u8> {
        Sha256::digest(data).to_vec()
    }

    fn name(&self) -> &'static str {
        SHA256
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Keccak256Hasher;

impl Hasher for Keccak256Hasher {
    fn compute(&self, data: &[u8]) -> Vec<u8> {
        keccak256(data).to_vec()
    }

    fn name(&self) -> &'static str {
        KECCAK
    }
}

/// Blake2b with a 32-byte digest.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake2bHasher;

impl Hasher for Blake2bHasher {
    fn compute(&self, data: &[u8]) -> Vec<u8> {
        Blake2b256::digest(data).to_vec()
    }

    fn name(&self) -> &'static str {
        BLAKE2B
    }
}

/// Configured hash identifier is not supported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown hasher '{0}', acceptable: {SHA256}, {KECCAK}, {BLAKE2B}")]
pub struct UnknownHasher(pub String);

/// Build a hasher from its configuration identifier (case-insensitive).
pub fn hasher_from_name(name: &str) -> Result<Arc<dyn Hasher>, UnknownHasher> {
    match name.trim().to_ascii_lowercase().as_str() {
        SHA256 => Ok(Arc::new(Sha256Hasher)),
        KECCAK | "keccak256" => Ok(Arc::new(Keccak256Hasher)),
        BLAKE2B => Ok(Arc::new(Blake2bHasher)),
        _ => Err(UnknownHasher(name.to_string())),
    }
}
