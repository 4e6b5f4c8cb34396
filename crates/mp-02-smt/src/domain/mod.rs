pub mod errors;
pub mod leaf;
pub mod path;
pub mod proof;
pub mod tree;

pub use errors::*;
pub use leaf::*;
pub use path::{TREE_HEIGHT, ZERO_HASH};
pub use proof::*;
pub use tree::{leaf_hash, merge, SparseMerkleTree, EMPTY_ROOT, LEAF_DOMAIN, NODE_DOMAIN};
