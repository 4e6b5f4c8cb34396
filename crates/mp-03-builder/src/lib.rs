//! # MP-03 Update Builder
//!
//! Off-chain construction of `MerkleUpdate` records.
//!
//! ## Role in System
//!
//! ```text
//! [CommitmentSource] ──current root──→ [UpdateBuilder] ──record bytes──→ witness
//!                                          │    ↑
//!                             set/prove    │    │ roots, proof
//!                                          ↓    │
//!                                        [SmtAdapter]
//! ```
//!
//! ## Failure Policy
//!
//! Every error aborts the attempt with no partial record. Callers retry by
//! refetching the current root and rebuilding.
//!
//! ## Usage Example
//!
//! ```ignore
//! use mp_03_builder::{AccountPoint, BuilderConfig, UpdateBuilder};
//!
//! let mut builder = UpdateBuilder::<CkbBlake2b>::with_accounts(BuilderConfig::default(), tracked)?;
//! let updates = builder.plan(vec![AccountPoint::new(address, 150)]);
//! let record = builder.build_transition(Some(builder.current_root()), &updates)?;
//! // ... submit, wait for acceptance ...
//! builder.apply(&record)?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
