//! Devnet Ledger Service
//!
//! Holds live commitment records and applies submissions with the host
//! ledger's lifecycle rules:
//!
//! - a record is never mutated; an accepted transition consumes it and
//!   creates a replacement with the same `TypeId`
//! - a consumed record is dead; spending it again fails
//! - every submission runs the state validator before anything is written
//!
//! The witnesses of accepted transitions are kept per `TypeId`, so the full
//! chain of records behind a commitment can be read back and replayed.
//!
//! Two clients racing on one record resolve optimistically: whoever commits
//! first wins, the other finds its input dead.

use std::collections::HashMap;

use mp_01_codec::{decode, MerkleUpdate};
use mp_04_validator::{StateValidator, TransactionView, WitnessArgs};
use point_telemetry::{log_event, LEDGER_RECORDS, LEDGER_TRANSITIONS};
use shared_crypto::{CkbBlake2b, HashPrimitive};
use shared_types::{to_prefixed_hex, Hash, LedgerRecord};
use tokio::sync::RwLock;

use crate::domain::{LedgerCell, OutPoint, PendingTransition, Receipt, SubmitError, TypeId};

const COMPONENT: &str = "devnet";

#[derive(Debug, Default)]
struct LedgerState {
    live: HashMap<OutPoint, LedgerCell>,
    by_type: HashMap<TypeId, OutPoint>,
    /// Record witnesses of accepted transitions, oldest first.
    witnesses: HashMap<TypeId, Vec<Vec<u8>>>,
    /// Accepted transactions so far; feeds transaction hashes.
    sequence: u64,
}

/// In-memory host ledger.
#[derive(Debug, Default)]
pub struct DevnetLedger<H: HashPrimitive = CkbBlake2b> {
    validator: StateValidator<H>,
    state: RwLock<LedgerState>,
}

impl DevnetLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: HashPrimitive> DevnetLedger<H> {
    /// Validate and apply one transition.
    pub async fn submit(&self, pending: PendingTransition) -> Result<Receipt, SubmitError> {
        let mut state = self.state.write().await;
        let result = self.apply(&mut state, &pending);

        match &result {
            Ok(receipt) => {
                LEDGER_TRANSITIONS.with_label_values(&["accepted"]).inc();
                log_event!(
                    info,
                    COMPONENT,
                    "Commitment record replaced",
                    type_id = %to_prefixed_hex(&receipt.cell.type_id.0),
                    out_point = %receipt.cell.out_point
                );
            }
            Err(e) => {
                LEDGER_TRANSITIONS.with_label_values(&[e.label()]).inc();
                log_event!(warn, COMPONENT, "Submission refused", error = %e);
            }
        }
        LEDGER_RECORDS.set(state.live.len() as f64);
        result
    }

    /// Live record with the given identity.
    pub async fn cell(&self, type_id: &TypeId) -> Option<LedgerCell> {
        let state = self.state.read().await;
        state
            .by_type
            .get(type_id)
            .and_then(|op| state.live.get(op))
            .copied()
    }

    /// Every record accepted for `type_id`, creation first.
    pub async fn history(&self, type_id: &TypeId) -> Vec<MerkleUpdate> {
        let state = self.state.read().await;
        let Some(witnesses) = state.witnesses.get(type_id) else {
            return Vec::new();
        };
        witnesses
            .iter()
            .filter_map(|bytes| match decode(bytes) {
                Ok(record) => Some(record),
                Err(e) => {
                    log_event!(error, COMPONENT, "Stored witness unreadable", error = %e);
                    None
                }
            })
            .collect()
    }

    pub async fn is_live(&self, out_point: &OutPoint) -> bool {
        self.state.read().await.live.contains_key(out_point)
    }

    /// Number of live records.
    pub async fn live_count(&self) -> usize {
        self.state.read().await.live.len()
    }

    fn apply(
        &self,
        state: &mut LedgerState,
        pending: &PendingTransition,
    ) -> Result<Receipt, SubmitError> {
        let consumed = match pending.consumes {
            Some(op) => Some(*state.live.get(&op).ok_or_else(|| SubmitError::DeadInput {
                out_point: op.to_string(),
            })?),
            None => None,
        };

        let tx = TransactionView {
            input_data: consumed.map(|cell| cell.record.to_vec()),
            output_data: pending.output_data.clone(),
            witnesses: vec![WitnessArgs::with_record(pending.record.clone())],
        };
        // Accepted means output_data is exactly the record's new root.
        let update = self.validator.validate(&tx)?;
        let record = LedgerRecord::new(update.new_root);

        let tx_hash = self.tx_hash(state.sequence, pending);
        let out_point = OutPoint::new(tx_hash, 0);
        let type_id = match consumed {
            Some(cell) => cell.type_id,
            None => TypeId::derive::<H>(&tx_hash, out_point.index),
        };
        let cell = LedgerCell {
            out_point,
            type_id,
            record,
        };

        if let Some(old) = consumed {
            state.live.remove(&old.out_point);
        }
        state.live.insert(out_point, cell);
        state.by_type.insert(type_id, out_point);
        state
            .witnesses
            .entry(type_id)
            .or_default()
            .push(pending.record.clone());
        state.sequence += 1;

        Ok(Receipt {
            cell,
            consumed: consumed.map(|c| c.out_point),
        })
    }

    fn tx_hash(&self, sequence: u64, pending: &PendingTransition) -> Hash {
        let consumed = pending
            .consumes
            .map(|op| [&op.tx_hash[..], &op.index.to_le_bytes()].concat())
            .unwrap_or_default();
        H::hash_parts(&[
            &sequence.to_le_bytes(),
            &consumed,
            &pending.output_data,
            &pending.record,
        ])
    }
}
