//! # Multi-Key Proofs
//!
//! A proof is the ordered list of sibling hashes consumed while merging the
//! proven leaves up to the root. On the wire, runs of empty siblings are
//! collapsed:
//!
//! ```text
//! 0x00 n          n empty siblings (1..=255)
//! 0x01 <32 bytes> one non-empty sibling
//! ```
//!
//! Only the form `compile` emits is accepted: a run is at most 255 and only
//! a full run may be followed by another, and an explicit sibling is never
//! the empty hash. Any other spelling of the same siblings is refused.
//!
//! Replaying a proof is strictly iterative: 256 level merges, each bounded by
//! the number of proven keys.

use std::collections::BTreeMap;

use shared_crypto::HashPrimitive;
use shared_types::Hash;

use super::path::{TREE_HEIGHT, ZERO_HASH};
use super::tree::{leaf_hash, merge_level, Level, EMPTY_ROOT};
use super::SmtError;

/// Tag for a run of empty siblings.
pub const TAG_ZERO_RUN: u8 = 0x00;
/// Tag for one explicit sibling hash.
pub const TAG_HASH: u8 = 0x01;

const MAX_RUN: usize = u8::MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiProof {
    siblings: Vec<Hash>,
}

impl MultiProof {
    pub fn new(siblings: Vec<Hash>) -> Self {
        Self { siblings }
    }

    pub fn siblings(&self) -> &[Hash] {
        &self.siblings
    }

    /// Serialize with empty-sibling runs collapsed.
    pub fn compile(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut run = 0usize;
        for sibling in &self.siblings {
            if *sibling == ZERO_HASH {
                run += 1;
                if run == MAX_RUN {
                    out.extend_from_slice(&[TAG_ZERO_RUN, MAX_RUN as u8]);
                    run = 0;
                }
                continue;
            }
            if run > 0 {
                out.extend_from_slice(&[TAG_ZERO_RUN, run as u8]);
                run = 0;
            }
            out.push(TAG_HASH);
            out.extend_from_slice(sibling);
        }
        if run > 0 {
            out.extend_from_slice(&[TAG_ZERO_RUN, run as u8]);
        }
        out
    }

    /// Parse a compiled proof, refusing to expand beyond `limit` siblings.
    ///
    /// `parse` is the inverse of `compile`: a split zero-run or a zero hash
    /// behind `TAG_HASH` is an error.
    pub fn parse(bytes: &[u8], limit: usize) -> Result<Self, SmtError> {
        let mut siblings = Vec::new();
        let mut position = 0;
        // Length of the run that ended at `position`, 0 after a hash.
        let mut open_run = 0usize;
        while position < bytes.len() {
            let tag = bytes[position];
            match tag {
                TAG_ZERO_RUN => {
                    let run = *bytes
                        .get(position + 1)
                        .ok_or(SmtError::TruncatedProof { position })?
                        as usize;
                    if run == 0 {
                        return Err(SmtError::EmptyRun { position });
                    }
                    if open_run > 0 && open_run < MAX_RUN {
                        return Err(SmtError::SplitRun { position });
                    }
                    if siblings.len() + run > limit {
                        return Err(SmtError::ProofTooLarge { limit });
                    }
                    siblings.resize(siblings.len() + run, ZERO_HASH);
                    open_run = run;
                    position += 2;
                }
                TAG_HASH => {
                    let raw = bytes
                        .get(position + 1..position + 33)
                        .ok_or(SmtError::TruncatedProof { position })?;
                    if siblings.len() + 1 > limit {
                        return Err(SmtError::ProofTooLarge { limit });
                    }
                    let mut sibling = [0u8; 32];
                    sibling.copy_from_slice(raw);
                    if sibling == ZERO_HASH {
                        return Err(SmtError::ZeroSibling { position });
                    }
                    siblings.push(sibling);
                    open_run = 0;
                    position += 33;
                }
                _ => return Err(SmtError::InvalidTag { tag, position }),
            }
        }
        Ok(Self { siblings })
    }

    /// Recompute the root implied by `leaves` (key, value) under this proof.
    ///
    /// Every sibling must be consumed exactly once. Duplicate keys are
    /// accepted only when they carry the same value.
    pub fn compute_root<H: HashPrimitive>(&self, leaves: &[(Hash, Hash)]) -> Result<Hash, SmtError> {
        if leaves.is_empty() {
            return Err(SmtError::EmptyKeySet);
        }

        let mut values: BTreeMap<Hash, Hash> = BTreeMap::new();
        for (key, value) in leaves {
            if let Some(existing) = values.insert(*key, *value) {
                if existing != *value {
                    return Err(SmtError::ConflictingLeaf {
                        key: hex::encode(key),
                    });
                }
            }
        }

        let mut current: Level = values
            .iter()
            .map(|(key, value)| (*key, leaf_hash::<H>(key, value)))
            .collect();
        let mut cursor = self.siblings.iter();

        for height in 0..TREE_HEIGHT {
            current = merge_level::<H, SmtError, _>(&current, height, |_| {
                cursor
                    .next()
                    .copied()
                    .ok_or(SmtError::ProofExhausted { height })
            })?;
        }

        let remaining = cursor.len();
        if remaining > 0 {
            return Err(SmtError::TrailingProof { remaining });
        }

        Ok(current.get(&ZERO_HASH).copied().unwrap_or(EMPTY_ROOT))
    }
}

/// Check `leaves` against `root` under a compiled proof.
pub fn verify_compiled<H: HashPrimitive>(
    root: &Hash,
    proof: &[u8],
    leaves: &[(Hash, Hash)],
) -> Result<bool, SmtError> {
    let limit = leaves.len().saturating_mul(TREE_HEIGHT);
    let proof = MultiProof::parse(proof, limit)?;
    Ok(proof.compute_root::<H>(leaves)? == *root)
}
