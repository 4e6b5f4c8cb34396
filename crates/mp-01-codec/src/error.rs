//! Error types for the record codec

use thiserror::Error;

/// Errors produced while encoding or decoding update records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A fixed-size field was given a value of the wrong length.
    ///
    /// Raised at encode time. This is a caller contract violation and the
    /// value is never truncated or padded.
    #[error("Invalid field size for `{field}`: expected {expected} bytes, got {actual}")]
    InvalidFieldSize {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The wire bytes are corrupt or truncated.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// The encoded record would not fit the 32-bit length header.
    #[error("Record too large: {size} bytes")]
    RecordTooLarge { size: usize },
}

impl CodecError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRecord(reason.into())
    }

    /// Whether this is a decode-side failure.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedRecord(_))
    }
}
