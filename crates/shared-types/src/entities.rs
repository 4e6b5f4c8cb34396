//! # Core Entities
//!
//! ## Clusters
//!
//! - **Identifiers**: `Hash`, `Address`
//! - **Ledger**: `LedgerRecord`, the 32-byte commitment stored on-chain

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};

use crate::DataError;

/// A 32-byte digest (tree root, leaf key or leaf value).
pub type Hash = [u8; 32];

/// A 32-byte account identifier. Opaque key material, only ever hashed.
pub type Address = [u8; 32];

/// Size of every fixed-width field on the wire.
pub const BYTE32_LEN: usize = 32;

/// The on-ledger commitment record.
///
/// Its entire persisted payload is the current sparse-Merkle-tree root. The
/// record is never mutated: every accepted transition consumes it and creates
/// a replacement.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Current commitment.
    #[serde_as(as = "Hex")]
    pub root: Hash,
}

impl LedgerRecord {
    pub fn new(root: Hash) -> Self {
        Self { root }
    }

    /// Parse record data. Anything other than exactly 32 bytes is rejected.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DataError> {
        Ok(Self {
            root: to_byte32(data)?,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.root
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.root.to_vec()
    }
}

/// Copy a slice into a 32-byte array, failing on any other length.
pub fn to_byte32(data: &[u8]) -> Result<[u8; 32], DataError> {
    data.try_into().map_err(|_| DataError::WrongLength {
        expected: BYTE32_LEN,
        actual: data.len(),
    })
}

/// Decode hex with an optional `0x` prefix.
pub fn parse_hex(input: &str) -> Result<Vec<u8>, DataError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits).map_err(|e| DataError::InvalidHex(e.to_string()))
}

/// Decode a 32-byte value from hex with an optional `0x` prefix.
pub fn parse_hash(input: &str) -> Result<Hash, DataError> {
    to_byte32(&parse_hex(input)?)
}

/// Encode bytes as `0x`-prefixed lowercase hex.
pub fn to_prefixed_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
