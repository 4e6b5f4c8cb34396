//! # Error Types
//!
//! Errors raised when turning untyped bytes or hex into shared entities.

use thiserror::Error;

/// Errors converting raw input into fixed-size entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// Input had the wrong number of bytes.
    #[error("Wrong length: expected {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    /// Input was not valid hex.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}
