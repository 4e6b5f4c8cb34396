use crate::domain::{LeafKey, LeafValue, SmtError};
use shared_types::Hash;

/// A leaf as seen by the verifier: `None` asserts absence.
pub type ProvenLeaf = (LeafKey, Option<LeafValue>);

/// Mutable tree capability used by the builder.
pub trait ProofTree: Send + Sync {
    /// Set or clear (`None`) a leaf.
    fn set(&mut self, key: LeafKey, value: Option<LeafValue>);

    fn get(&self, key: &LeafKey) -> Option<LeafValue>;

    fn root(&self) -> Hash;

    /// Compiled multi-key proof for `keys` at the current state.
    fn prove_multi(&self, keys: &[LeafKey]) -> Result<Vec<u8>, SmtError>;
}

/// Stateless proof check shared by builder and validator.
pub trait ProofVerifier: Send + Sync {
    /// True when every leaf in `leaves` is consistent with `root` under
    /// `proof`. Malformed proofs verify as false.
    fn verify(&self, root: &Hash, proof: &[u8], leaves: &[ProvenLeaf]) -> bool;
}
