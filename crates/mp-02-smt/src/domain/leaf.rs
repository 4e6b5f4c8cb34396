//! # Leaf Derivation
//!
//! Maps record fields onto tree positions:
//!
//! - `key(address) = H(address)`
//! - `value(point) = H(minimal big-endian bytes of point)`
//!
//! The record stores points as 4-byte integers but the value preimage is the
//! shortest big-endian form (`150` hashes as `[0x96]`, `0` as `[0x00]`).
//! Builder and validator must agree on this bit for bit.
//!
//! An `old_point` of zero means the account was absent from the old tree, so
//! its old leaf is empty rather than `value(0)`.

use mp_01_codec::AccountUpdate;
use shared_crypto::HashPrimitive;
use shared_types::{Address, Hash};

/// Position of an account in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LeafKey(pub Hash);

/// Hashed point balance stored at a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeafValue(pub Hash);

/// Shortest big-endian encoding of `point`; zero encodes as one zero byte.
pub fn point_preimage(point: u32) -> Vec<u8> {
    let bytes = point.to_be_bytes();
    let start = bytes
        .iter()
        .position(|b| *b != 0)
        .unwrap_or(bytes.len() - 1);
    bytes[start..].to_vec()
}

pub fn leaf_key<H: HashPrimitive>(address: &Address) -> LeafKey {
    LeafKey(H::hash(address))
}

pub fn leaf_value<H: HashPrimitive>(point: u32) -> LeafValue {
    LeafValue(H::hash(&point_preimage(point)))
}

/// Old-state leaf of an update; `None` when the account is being introduced.
pub fn old_leaf<H: HashPrimitive>(update: &AccountUpdate) -> (LeafKey, Option<LeafValue>) {
    let value = (!update.is_insertion()).then(|| leaf_value::<H>(update.old_point));
    (leaf_key::<H>(&update.address), value)
}

/// New-state leaf of an update.
pub fn new_leaf<H: HashPrimitive>(update: &AccountUpdate) -> (LeafKey, Option<LeafValue>) {
    (
        leaf_key::<H>(&update.address),
        Some(leaf_value::<H>(update.new_point)),
    )
}
