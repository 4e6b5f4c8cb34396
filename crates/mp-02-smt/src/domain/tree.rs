//! # Sparse Merkle Tree
//!
//! 256-level binary tree over 32-byte keys. Only non-empty leaves are stored;
//! every node hash is recomputed from them on demand.
//!
//! ## Hashing
//!
//! - empty subtree: `ZERO_HASH` at every height
//! - leaf: `H(LEAF_DOMAIN ‖ key ‖ value)`, or `ZERO_HASH` for an empty value
//! - inner: `H(NODE_DOMAIN ‖ height ‖ left ‖ right)`, or `ZERO_HASH` when
//!   both children are empty

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::marker::PhantomData;

use shared_crypto::HashPrimitive;
use shared_types::Hash;

use super::path::{bit, parent_path, sibling_path, TREE_HEIGHT, ZERO_HASH};
use super::proof::MultiProof;
use super::SmtError;

/// Domain separator for leaf hashes.
pub const LEAF_DOMAIN: u8 = 0x00;
/// Domain separator for inner node hashes.
pub const NODE_DOMAIN: u8 = 0x01;

/// Root of a tree with no leaves.
pub const EMPTY_ROOT: Hash = ZERO_HASH;

/// Nodes of one tree level, keyed by node path.
pub(crate) type Level = BTreeMap<Hash, Hash>;

pub fn leaf_hash<H: HashPrimitive>(key: &Hash, value: &Hash) -> Hash {
    if *value == ZERO_HASH {
        return ZERO_HASH;
    }
    H::hash_parts(&[&[LEAF_DOMAIN], key, value])
}

pub fn merge<H: HashPrimitive>(height: usize, left: &Hash, right: &Hash) -> Hash {
    if *left == ZERO_HASH && *right == ZERO_HASH {
        return ZERO_HASH;
    }
    H::hash_parts(&[&[NODE_DOMAIN], &[height as u8], left, right])
}

/// Merge every node of `level` with its sibling, producing the level above.
///
/// Siblings missing from `level` are requested from `sibling`, in path order.
/// Prover and verifier both go through this function, so the order in which
/// siblings are requested is the order in which they are stored in a proof.
pub(crate) fn merge_level<H, E, F>(level: &Level, height: usize, mut sibling: F) -> Result<Level, E>
where
    H: HashPrimitive,
    F: FnMut(&Hash) -> Result<Hash, E>,
{
    let mut parents = Level::new();
    for (path, node) in level {
        let parent = parent_path(path, height);
        if parents.contains_key(&parent) {
            continue;
        }
        let sibling_key = sibling_path(path, height);
        let sibling_hash = match level.get(&sibling_key) {
            Some(hash) => *hash,
            None => sibling(&sibling_key)?,
        };
        let (left, right) = if bit(path, height) {
            (sibling_hash, *node)
        } else {
            (*node, sibling_hash)
        };
        parents.insert(parent, merge::<H>(height, &left, &right));
    }
    Ok(parents)
}

/// In-memory sparse Merkle tree.
#[derive(Debug, Clone)]
pub struct SparseMerkleTree<H: HashPrimitive> {
    leaves: BTreeMap<Hash, Hash>,
    _hasher: PhantomData<H>,
}

impl<H: HashPrimitive> Default for SparseMerkleTree<H> {
    fn default() -> Self {
        Self {
            leaves: BTreeMap::new(),
            _hasher: PhantomData,
        }
    }
}

impl<H: HashPrimitive> SparseMerkleTree<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a leaf. Writing `ZERO_HASH` removes the key.
    pub fn update(&mut self, key: Hash, value: Hash) {
        if value == ZERO_HASH {
            self.leaves.remove(&key);
        } else {
            self.leaves.insert(key, value);
        }
    }

    /// Leaf value, `ZERO_HASH` when absent.
    pub fn get(&self, key: &Hash) -> Hash {
        self.leaves.get(key).copied().unwrap_or(ZERO_HASH)
    }

    /// Number of non-empty leaves.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn root(&self) -> Hash {
        self.levels()
            .last()
            .and_then(|top| top.get(&ZERO_HASH).copied())
            .unwrap_or(EMPTY_ROOT)
    }

    /// Build a multi-key proof for `keys` against the current root.
    ///
    /// The proof holds every sibling that cannot be derived from the proven
    /// keys themselves. Because it never contains the proven leaves, the same
    /// proof verifies any assignment of values to those keys against the
    /// root that assignment produces.
    pub fn merkle_proof(&self, keys: &[Hash]) -> Result<MultiProof, SmtError> {
        if keys.is_empty() {
            return Err(SmtError::EmptyKeySet);
        }

        let levels = self.levels();
        let mut siblings = Vec::new();
        let mut current: Level = keys
            .iter()
            .map(|key| (*key, leaf_hash::<H>(key, &self.get(key))))
            .collect();

        for (height, known) in levels.iter().take(TREE_HEIGHT).enumerate() {
            current = merge_level::<H, Infallible, _>(&current, height, |path| {
                let hash = known.get(path).copied().unwrap_or(ZERO_HASH);
                siblings.push(hash);
                Ok(hash)
            })
            .unwrap_or_else(|never| match never {});
        }

        Ok(MultiProof::new(siblings))
    }

    /// All non-empty nodes, level by level from the leaves (index 0) up to
    /// the root (index 256).
    fn levels(&self) -> Vec<Level> {
        let mut levels = Vec::with_capacity(TREE_HEIGHT + 1);
        let mut current: Level = self
            .leaves
            .iter()
            .map(|(key, value)| (*key, leaf_hash::<H>(key, value)))
            .collect();

        for height in 0..TREE_HEIGHT {
            let next = merge_level::<H, Infallible, _>(&current, height, |_| Ok(ZERO_HASH))
                .unwrap_or_else(|never| match never {});
            levels.push(current);
            current = next;
        }
        levels.push(current);
        levels
    }
}
