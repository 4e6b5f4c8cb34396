//! # State Validator
//!
//! Single-pass state machine run once per transaction:
//!
//! ```text
//! Start ──load record──→ WitnessLoaded ──old checks──→ OldRootChecked
//!   │                        │                              │
//!   ↓ R1                     ↓ R2                           ├──new checks──→ NewRootChecked (accept)
//!                                                           ↓ R3
//! ```
//!
//! A transaction without an input commitment is a creation and skips the
//! old-state checks. The validator is a pure function of (input commitment,
//! output commitment, record bytes): it writes nothing and keeps no state
//! between calls.

use mp_01_codec::{decode, MerkleUpdate};
use mp_02_smt::{new_leaf, old_leaf, ProofVerifier, ProvenLeaf, SmtVerifier};
use shared_crypto::{CkbBlake2b, HashPrimitive};
use shared_types::{to_prefixed_hex, LedgerRecord};
use tracing::{debug, info, warn};

use crate::domain::{Rejection, TransactionView, ValidationOutcome, RECORD_WITNESS_INDEX};

/// Progress through one validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorState {
    Start,
    WitnessLoaded,
    OldRootChecked,
    NewRootChecked,
}

/// Validator for one hash primitive. Must match the builder's.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateValidator<H: HashPrimitive = CkbBlake2b> {
    verifier: SmtVerifier<H>,
}

impl StateValidator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: HashPrimitive> StateValidator<H> {
    /// Run the state machine over `tx`, returning the accepted record.
    pub fn validate(&self, tx: &TransactionView) -> Result<MerkleUpdate, Rejection> {
        let result = self.validate_parts(
            tx.input_data.as_deref(),
            &tx.output_data,
            tx.record_bytes(),
        );
        match &result {
            Ok(record) => info!(
                accounts = record.accounts.len(),
                new_root = %to_prefixed_hex(&record.new_root),
                "Transition accepted"
            ),
            Err(rejection) => warn!(
                outcome = %rejection.outcome(),
                reason = %rejection,
                "Transition rejected"
            ),
        }
        result
    }

    /// Outcome code for `tx`.
    pub fn outcome(&self, tx: &TransactionView) -> ValidationOutcome {
        match self.validate(tx) {
            Ok(_) => ValidationOutcome::Accepted,
            Err(rejection) => rejection.outcome(),
        }
    }

    /// The check on raw parts: input record data (`None` or empty for a
    /// creation), output record data and the record slot.
    pub fn validate_parts(
        &self,
        input_data: Option<&[u8]>,
        output_data: &[u8],
        record_bytes: Option<&[u8]>,
    ) -> Result<MerkleUpdate, Rejection> {
        let mut state = ValidatorState::Start;

        // Start → WitnessLoaded
        let bytes = record_bytes.ok_or_else(|| {
            Rejection::MissingRecord(format!("no record in witness {}", RECORD_WITNESS_INDEX))
        })?;
        let record = decode(bytes).map_err(|e| Rejection::MissingRecord(e.to_string()))?;
        state = self.advance(state, ValidatorState::WitnessLoaded);

        // WitnessLoaded → OldRootChecked
        match input_data.filter(|data| !data.is_empty()) {
            Some(data) => {
                let input = LedgerRecord::from_bytes(data)
                    .map_err(|e| Rejection::OldStateInvalid(format!("input record: {}", e)))?;
                if input.root != record.old_root {
                    return Err(Rejection::OldStateInvalid(format!(
                        "input commitment {} differs from record old root {}",
                        to_prefixed_hex(&input.root),
                        to_prefixed_hex(&record.old_root)
                    )));
                }
                let leaves: Vec<ProvenLeaf> = record.accounts.iter().map(old_leaf::<H>).collect();
                if !self.verifier.verify(&record.old_root, &record.proof, &leaves) {
                    return Err(Rejection::OldStateInvalid(
                        "old leaves do not match old root".to_string(),
                    ));
                }
            }
            None => debug!("No input commitment, creation skips old-state checks"),
        }
        state = self.advance(state, ValidatorState::OldRootChecked);

        // OldRootChecked → NewRootChecked
        let output = LedgerRecord::from_bytes(output_data)
            .map_err(|e| Rejection::NewStateInvalid(format!("output record: {}", e)))?;
        if output.root != record.new_root {
            return Err(Rejection::NewStateInvalid(format!(
                "output commitment {} differs from record new root {}",
                to_prefixed_hex(&output.root),
                to_prefixed_hex(&record.new_root)
            )));
        }
        let leaves: Vec<ProvenLeaf> = record.accounts.iter().map(new_leaf::<H>).collect();
        if !self.verifier.verify(&record.new_root, &record.proof, &leaves) {
            return Err(Rejection::NewStateInvalid(
                "new leaves do not match new root".to_string(),
            ));
        }
        self.advance(state, ValidatorState::NewRootChecked);

        Ok(record)
    }

    fn advance(&self, from: ValidatorState, to: ValidatorState) -> ValidatorState {
        debug!(?from, ?to, hasher = H::NAME, "Validator state");
        to
    }
}
