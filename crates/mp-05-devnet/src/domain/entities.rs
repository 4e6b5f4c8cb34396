//! # Ledger Entities
//!
//! - `OutPoint`: address of a live cell (creating transaction, output index)
//! - `TypeId`: stable identity of one commitment record across replacements
//! - `LedgerCell`: a live commitment record
//! - `PendingTransition`: what a client submits

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_crypto::HashPrimitive;
use shared_types::{to_prefixed_hex, Hash, LedgerRecord};

/// Domain tag mixed into every type id.
pub const TYPE_ID_TAG: &[u8] = b"mp-type-id";

#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutPoint {
    #[serde_as(as = "Hex")]
    pub tx_hash: Hash,
    pub index: u32,
}

impl OutPoint {
    pub fn new(tx_hash: Hash, index: u32) -> Self {
        Self { tx_hash, index }
    }
}

impl std::fmt::Display for OutPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", to_prefixed_hex(&self.tx_hash), self.index)
    }
}

/// Identity of a commitment record, fixed at creation.
///
/// Derived from the creating transaction's seed and the output index, so no
/// two creations can share one.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(#[serde_as(as = "Hex")] pub Hash);

impl TypeId {
    pub fn derive<H: HashPrimitive>(seed: &Hash, output_index: u32) -> Self {
        Self(H::hash_parts(&[
            TYPE_ID_TAG,
            seed,
            &output_index.to_le_bytes(),
        ]))
    }
}

/// A live commitment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerCell {
    pub out_point: OutPoint,
    pub type_id: TypeId,
    pub record: LedgerRecord,
}

impl LedgerCell {
    pub fn root(&self) -> Hash {
        self.record.root
    }
}

/// A client's request to create (`consumes: None`) or replace a record.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransition {
    pub consumes: Option<OutPoint>,
    /// Data of the new record.
    #[serde_as(as = "Hex")]
    pub output_data: Vec<u8>,
    /// Encoded `MerkleUpdate`, placed in witness 0.
    #[serde_as(as = "Hex")]
    pub record: Vec<u8>,
}

impl PendingTransition {
    pub fn create(output_root: Hash, record: Vec<u8>) -> Self {
        Self {
            consumes: None,
            output_data: output_root.to_vec(),
            record,
        }
    }

    pub fn replace(consumes: OutPoint, output_root: Hash, record: Vec<u8>) -> Self {
        Self {
            consumes: Some(consumes),
            output_data: output_root.to_vec(),
            record,
        }
    }
}

/// Result of an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    pub cell: LedgerCell,
    /// The record that was consumed, if any.
    pub consumed: Option<OutPoint>,
}
