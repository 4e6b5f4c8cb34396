//! # Hash Primitives
//!
//! Fixed 32-byte-output hashes used for leaf keys, leaf values and tree
//! nodes. Builder and validator must be instantiated with the same primitive;
//! a mismatch yields proofs that never verify.
//!
//! ## Primitives
//!
//! - `CkbBlake2b`: BLAKE2b-256 personalised with `ckb-default-hash` (default)
//! - `Blake3`: BLAKE3, kept for deployments that do not target CKB

use blake2b_simd::Params;
use shared_types::Hash;

/// Personalisation string of the CKB default hash.
pub const CKB_HASH_PERSONALIZATION: &[u8; 16] = b"ckb-default-hash";

/// A cryptographic hash with a 32-byte output.
pub trait HashPrimitive: std::fmt::Debug + Clone + Copy + Default + Send + Sync + 'static {
    /// Short name used in logs and CLI output.
    const NAME: &'static str;

    /// Hash the concatenation of `parts`.
    fn hash_parts(parts: &[&[u8]]) -> Hash;

    /// Hash a single buffer.
    fn hash(data: &[u8]) -> Hash {
        Self::hash_parts(&[data])
    }
}

/// BLAKE2b-256 with the `ckb-default-hash` personalisation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CkbBlake2b;

impl HashPrimitive for CkbBlake2b {
    const NAME: &'static str = "ckb-blake2b-256";

    fn hash_parts(parts: &[&[u8]]) -> Hash {
        let mut state = Params::new()
            .hash_length(32)
            .personal(CKB_HASH_PERSONALIZATION)
            .to_state();
        for part in parts {
            state.update(part);
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(state.finalize().as_bytes());
        out
    }
}

/// BLAKE3 (unkeyed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake3;

impl HashPrimitive for Blake3 {
    const NAME: &'static str = "blake3";

    fn hash_parts(parts: &[&[u8]]) -> Hash {
        let mut hasher = blake3::Hasher::new();
        for part in parts {
            hasher.update(part);
        }
        *hasher.finalize().as_bytes()
    }
}
