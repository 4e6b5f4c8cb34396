//! # MP-05 Devnet
//!
//! In-memory host ledger for Merkle-Points commitment records.
//!
//! ## Role in System
//!
//! ```text
//! [UpdateBuilder] ──PendingTransition──→ [DevnetLedger] ──validate──→ [StateValidator]
//!        ↑                                    │
//!        └──── LedgerCommitmentSource ←───────┘ live cells (replace, never mutate)
//! ```
//!
//! Stands in for the real chain in integration tests and local tooling. It
//! enforces what the chain enforces for this script: a record can be spent
//! once, each record keeps its `TypeId` across replacements, and nothing is
//! written unless the validator accepts.

pub mod adapters;
pub mod domain;
pub mod service;

pub use adapters::*;
pub use domain::*;
pub use service::*;
