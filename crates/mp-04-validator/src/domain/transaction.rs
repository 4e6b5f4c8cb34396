//! # Transaction View
//!
//! The slice of a host-ledger transaction the validator reads: the data of
//! the commitment record being consumed (if any), the data of the record
//! being created, and the witnesses of the script group.

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};

/// Witness slot holding the update record.
pub const RECORD_WITNESS_INDEX: usize = 0;

/// Per-input auxiliary data. The record travels in `input_type`.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessArgs {
    #[serde_as(as = "Option<Hex>")]
    pub lock: Option<Vec<u8>>,
    #[serde_as(as = "Option<Hex>")]
    pub input_type: Option<Vec<u8>>,
    #[serde_as(as = "Option<Hex>")]
    pub output_type: Option<Vec<u8>>,
}

impl WitnessArgs {
    /// Witness carrying an encoded record and nothing else.
    pub fn with_record(record: Vec<u8>) -> Self {
        Self {
            input_type: Some(record),
            ..Default::default()
        }
    }
}

/// What the validator sees of one transaction.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionView {
    /// Data of the consumed commitment record; `None` for a creation.
    #[serde_as(as = "Option<Hex>")]
    pub input_data: Option<Vec<u8>>,
    /// Data of the created commitment record.
    #[serde_as(as = "Hex")]
    pub output_data: Vec<u8>,
    pub witnesses: Vec<WitnessArgs>,
}

impl TransactionView {
    /// Creation of the first commitment record.
    pub fn creation(output_root: &[u8], record: Vec<u8>) -> Self {
        Self {
            input_data: None,
            output_data: output_root.to_vec(),
            witnesses: vec![WitnessArgs::with_record(record)],
        }
    }

    /// Replacement of an existing commitment record.
    pub fn replacement(input_root: &[u8], output_root: &[u8], record: Vec<u8>) -> Self {
        Self {
            input_data: Some(input_root.to_vec()),
            output_data: output_root.to_vec(),
            witnesses: vec![WitnessArgs::with_record(record)],
        }
    }

    /// Bytes in the record slot, if any.
    pub fn record_bytes(&self) -> Option<&[u8]> {
        self.witnesses
            .get(RECORD_WITNESS_INDEX)
            .and_then(|w| w.input_type.as_deref())
    }
}
