//! Error types for proving and decoding.
//!
//! Verification never produces an [`Error`]: an invalid proof is reported as `false`.

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Caller supplied an argument outside the accepted domain
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An algebraic self-check failed while proving. This is a bug, not a user error.
    #[error("Consistency check failed: {0}")]
    Consistency(&'static str),

    /// Malformed or incompatible serialized proof
    #[error("Invalid proof format: {0}")]
    Format(String),
}
