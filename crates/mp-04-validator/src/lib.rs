//! # MP-04 State Validator
//!
//! The on-chain half of Merkle-Points: decides whether one transaction may
//! replace the ledger's commitment record.
//!
//! ## Role in System
//!
//! ```text
//! transaction ──input data, output data, witness[0]──→ [StateValidator]
//!                                                          │
//!                         decode ← mp-01-codec             │
//!                         verify ← mp-02-smt (same hasher) │
//!                                                          ↓
//!                                 Accepted | R1 | R2 | R3 (exit 0..=3)
//! ```
//!
//! ## Determinism
//!
//! Independent validators must reach the same decision on the same input.
//! The check has no I/O, no clock, no randomness and no shared state.

pub mod domain;

pub use domain::*;
