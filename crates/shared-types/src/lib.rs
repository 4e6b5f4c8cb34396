//! # Shared Types
//!
//! Primitive types shared across the Merkle-Points crates.
//!
//! ## Contents
//!
//! - `Hash` / `Address`: 32-byte opaque values
//! - `LedgerRecord`: the on-ledger commitment record (exactly one root)
//! - Hex helpers used by the CLI and JSON fixtures

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
