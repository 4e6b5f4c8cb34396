//! # Key Paths
//!
//! A leaf key is a 256-bit big-endian number. The root branches on the most
//! significant bit; leaves sit at height 0 and the root at height 256. A node
//! at height `h` is identified by its key prefix with bits `0..h` cleared.

use shared_types::Hash;

/// Number of levels between leaves and root.
pub const TREE_HEIGHT: usize = 256;

/// Hash of an empty subtree at any height.
pub const ZERO_HASH: Hash = [0u8; 32];

/// Bit of `path` that decides the branch when merging at `height`.
pub fn bit(path: &Hash, height: usize) -> bool {
    (path[31 - height / 8] >> (height % 8)) & 1 == 1
}

/// Identifier of the parent node: bits `0..=height` cleared.
pub fn parent_path(path: &Hash, height: usize) -> Hash {
    let mut parent = *path;
    let cleared = height + 1;
    for byte in parent.iter_mut().rev().take(cleared / 8) {
        *byte = 0;
    }
    let rem = cleared % 8;
    if rem > 0 {
        parent[31 - cleared / 8] &= 0xffu8 << rem;
    }
    parent
}

/// Identifier of the sibling node at the same height.
pub fn sibling_path(path: &Hash, height: usize) -> Hash {
    let mut sibling = *path;
    sibling[31 - height / 8] ^= 1 << (height % 8);
    sibling
}
