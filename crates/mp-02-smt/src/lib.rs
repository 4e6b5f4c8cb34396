//! # MP-02 SMT
//!
//! Sparse Merkle tree capability and the proof adapter shared by the update
//! builder and the state validator.
//!
//! ## Role in System
//!
//! ```text
//! [Builder (3)] ──set/root/prove_multi──→ [SmtAdapter]
//!                                             │ compiled proof
//!                                             ↓
//! [Validator (4)] ──verify(root, proof, leaves)──→ [SmtVerifier]
//! ```
//!
//! Both sides derive keys and values through `domain::leaf`, and both are
//! generic over one `HashPrimitive`. A builder and validator instantiated
//! with different primitives never agree on a root.
//!
//! ## Proof Shape
//!
//! A proof never contains the proven leaves themselves, only the siblings
//! needed to merge them up. The same bytes therefore check the old leaves
//! against the old root and the new leaves against the new root.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
