use mp_01_codec::CodecError;
use mp_02_smt::SmtError;
use thiserror::Error;

/// Errors that abort a build. No partial record is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The caller's update set contradicts itself or the tracked state.
    #[error("Inconsistent update for {address}: {reason}")]
    InconsistentUpdate { address: String, reason: String },

    /// The old root rebuilt from the update set is not the ledger's root.
    #[error("Prior root mismatch: ledger has {expected}, update set implies {computed}")]
    PriorRootMismatch { expected: String, computed: String },

    #[error("Empty update set")]
    EmptyUpdate,

    #[error("Too many accounts: {count} > {max}")]
    TooManyAccounts { count: usize, max: usize },

    /// A record does not start (or end) where the mirror says it should.
    #[error("Mirror out of date: mirror root {mirror_root}, record root {record_root}")]
    StaleMirror {
        mirror_root: String,
        record_root: String,
    },

    /// The freshly generated proof failed the builder's own replay.
    #[error("Proof self-check failed for the {side} state")]
    ProofSelfCheckFailed { side: &'static str },

    #[error("Invalid builder configuration: {0}")]
    InvalidConfig(String),

    #[error("Proof generation failed: {0}")]
    Proof(#[from] SmtError),

    #[error("Encoding failed: {0}")]
    Codec(#[from] CodecError),

    #[error("Commitment source failed: {0}")]
    Source(#[from] SourceError),
}

impl BuildError {
    /// Short label used for the `reason` metric dimension.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InconsistentUpdate { .. } => "inconsistent",
            Self::PriorRootMismatch { .. } => "prior_root",
            Self::EmptyUpdate => "empty",
            Self::TooManyAccounts { .. } => "too_many",
            Self::StaleMirror { .. } => "stale",
            Self::ProofSelfCheckFailed { .. } => "self_check",
            Self::InvalidConfig(_) => "config",
            Self::Proof(_) => "proof",
            Self::Codec(_) => "codec",
            Self::Source(_) => "source",
        }
    }
}

/// Errors from a [`CommitmentSource`](crate::ports::CommitmentSource).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}
