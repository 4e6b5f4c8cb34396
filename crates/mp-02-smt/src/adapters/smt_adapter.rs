use std::marker::PhantomData;

use shared_crypto::{CkbBlake2b, HashPrimitive};
use shared_types::Hash;
use tracing::debug;

use crate::domain::{
    verify_compiled, LeafKey, LeafValue, SmtError, SparseMerkleTree, ZERO_HASH,
};
use crate::ports::{ProofTree, ProofVerifier, ProvenLeaf};

/// `ProofTree` backed by the in-memory sparse Merkle tree.
#[derive(Debug, Clone, Default)]
pub struct SmtAdapter<H: HashPrimitive = CkbBlake2b> {
    tree: SparseMerkleTree<H>,
}

impl<H: HashPrimitive> SmtAdapter<H> {
    pub fn new() -> Self {
        Self {
            tree: SparseMerkleTree::new(),
        }
    }

    /// Number of present leaves.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

impl<H: HashPrimitive> ProofTree for SmtAdapter<H> {
    fn set(&mut self, key: LeafKey, value: Option<LeafValue>) {
        self.tree.update(key.0, value.map(|v| v.0).unwrap_or(ZERO_HASH));
    }

    fn get(&self, key: &LeafKey) -> Option<LeafValue> {
        let value = self.tree.get(&key.0);
        (value != ZERO_HASH).then_some(LeafValue(value))
    }

    fn root(&self) -> Hash {
        self.tree.root()
    }

    fn prove_multi(&self, keys: &[LeafKey]) -> Result<Vec<u8>, SmtError> {
        let keys: Vec<Hash> = keys.iter().map(|k| k.0).collect();
        Ok(self.tree.merkle_proof(&keys)?.compile())
    }
}

/// `ProofVerifier` for proofs produced by [`SmtAdapter`] with the same hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtVerifier<H: HashPrimitive = CkbBlake2b> {
    _hasher: PhantomData<H>,
}

impl<H: HashPrimitive> SmtVerifier<H> {
    pub fn new() -> Self {
        Self {
            _hasher: PhantomData,
        }
    }
}

impl<H: HashPrimitive> ProofVerifier for SmtVerifier<H> {
    fn verify(&self, root: &Hash, proof: &[u8], leaves: &[ProvenLeaf]) -> bool {
        let leaves: Vec<(Hash, Hash)> = leaves
            .iter()
            .map(|(key, value)| (key.0, value.map(|v| v.0).unwrap_or(ZERO_HASH)))
            .collect();
        match verify_compiled::<H>(root, proof, &leaves) {
            Ok(matches) => matches,
            Err(e) => {
                debug!(hasher = H::NAME, error = %e, "proof rejected");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{leaf_key, leaf_value, new_leaf, old_leaf, EMPTY_ROOT};
    use mp_01_codec::AccountUpdate;
    use shared_crypto::Blake3;

    fn address(byte: u8) -> [u8; 32] {
        [byte; 32]
    }

    #[test]
    fn test_get_reflects_set() {
        let mut tree = SmtAdapter::<CkbBlake2b>::new();
        let key = leaf_key::<CkbBlake2b>(&address(1));
        assert_eq!(tree.get(&key), None);

        tree.set(key, Some(leaf_value::<CkbBlake2b>(5)));
        assert_eq!(tree.get(&key), Some(leaf_value::<CkbBlake2b>(5)));
        assert_eq!(tree.len(), 1);

        tree.set(key, None);
        assert_eq!(tree.get(&key), None);
        assert_eq!(tree.root(), EMPTY_ROOT);
    }

    #[test]
    fn test_creation_proof() {
        let update = AccountUpdate::new(address(7), 0, 150);
        let mut tree = SmtAdapter::<CkbBlake2b>::new();
        let (key, value) = new_leaf::<CkbBlake2b>(&update);
        tree.set(key, value);

        let proof = tree.prove_multi(&[key]).unwrap();
        let verifier = SmtVerifier::<CkbBlake2b>::new();
        assert!(verifier.verify(&tree.root(), &proof, &[new_leaf::<CkbBlake2b>(&update)]));
        assert!(verifier.verify(&EMPTY_ROOT, &proof, &[old_leaf::<CkbBlake2b>(&update)]));
    }

    #[test]
    fn test_batch_with_present_and_absent_old_leaves() {
        let mut tree = SmtAdapter::<CkbBlake2b>::new();
        let existing = AccountUpdate::new(address(1), 100, 120);
        let fresh = AccountUpdate::new(address(2), 0, 30);

        let (key, value) = old_leaf::<CkbBlake2b>(&existing);
        tree.set(key, value);
        let old_root = tree.root();

        for update in [&existing, &fresh] {
            let (key, value) = new_leaf::<CkbBlake2b>(update);
            tree.set(key, value);
        }
        let new_root = tree.root();
        let keys = [
            leaf_key::<CkbBlake2b>(&existing.address),
            leaf_key::<CkbBlake2b>(&fresh.address),
        ];
        let proof = tree.prove_multi(&keys).unwrap();

        let verifier = SmtVerifier::<CkbBlake2b>::new();
        let old: Vec<_> = [&existing, &fresh].iter().map(|u| old_leaf::<CkbBlake2b>(u)).collect();
        let new: Vec<_> = [&existing, &fresh].iter().map(|u| new_leaf::<CkbBlake2b>(u)).collect();
        assert!(verifier.verify(&old_root, &proof, &old));
        assert!(verifier.verify(&new_root, &proof, &new));
        assert!(!verifier.verify(&new_root, &proof, &old));
    }

    #[test]
    fn test_hasher_mismatch_never_verifies() {
        let update = AccountUpdate::new(address(3), 0, 10);
        let mut tree = SmtAdapter::<CkbBlake2b>::new();
        let (key, value) = new_leaf::<CkbBlake2b>(&update);
        tree.set(key, value);
        let proof = tree.prove_multi(&[key]).unwrap();

        let verifier = SmtVerifier::<Blake3>::new();
        assert!(!verifier.verify(&tree.root(), &proof, &[new_leaf::<Blake3>(&update)]));
        assert!(!verifier.verify(&tree.root(), &proof, &[new_leaf::<CkbBlake2b>(&update)]));
    }

    #[test]
    fn test_malformed_proof_is_false() {
        let verifier = SmtVerifier::<CkbBlake2b>::new();
        let leaf = new_leaf::<CkbBlake2b>(&AccountUpdate::new(address(4), 0, 1));
        assert!(!verifier.verify(&EMPTY_ROOT, &[0x07, 0x01], &[leaf]));
        assert!(!verifier.verify(&EMPTY_ROOT, &[], &[leaf]));
    }
}
