//! # Shared Crypto
//!
//! Hash primitives for the Merkle-Points workspace.
//!
//! | Primitive | Algorithm | Use Case |
//! |-----------|-----------|----------|
//! | `CkbBlake2b` | BLAKE2b-256, `ckb-default-hash` | Default, CKB-compatible |
//! | `Blake3` | BLAKE3 | Alternative deployments |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod hashing;

pub use hashing::{Blake3, CkbBlake2b, HashPrimitive, CKB_HASH_PERSONALIZATION};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
