use thiserror::Error;

/// Errors raised while producing or replaying a multi-key proof.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmtError {
    #[error("Proof requested for an empty key set")]
    EmptyKeySet,

    #[error("Proof exhausted while merging height {height}")]
    ProofExhausted { height: usize },

    #[error("Proof has {remaining} unused siblings")]
    TrailingProof { remaining: usize },

    #[error("Invalid proof tag 0x{tag:02x} at byte {position}")]
    InvalidTag { tag: u8, position: usize },

    #[error("Truncated proof at byte {position}")]
    TruncatedProof { position: usize },

    #[error("Empty zero-run at byte {position}")]
    EmptyRun { position: usize },

    #[error("Zero-run at byte {position} continues a run shorter than 255")]
    SplitRun { position: usize },

    #[error("Explicit empty sibling at byte {position}")]
    ZeroSibling { position: usize },

    #[error("Proof too large: more than {limit} siblings")]
    ProofTooLarge { limit: usize },

    #[error("Conflicting values for leaf key {key}")]
    ConflictingLeaf { key: String },
}
