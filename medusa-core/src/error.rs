//! Structured error types for the Medusa toolkit.

use thiserror::Error;

/// Unified error type for all Medusa operations.
#[derive(Debug, Error)]
pub enum MedusaError {
    /// I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error (malformed input data)
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid input (bad arguments, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error (unknown chain, unresolvable residue, bad square
    /// geometry). Always fatal; never retried.
    #[error("configuration error: {0}")]
    Config(String),

    /// Reference and comparison sides of a correspondence disagree in
    /// composition. Surfaced to the caller, who decides whether to continue.
    #[error("correspondence mismatch: {0}")]
    Mismatch(String),

    /// A residue pair has no atoms in common under the allow-list, so no
    /// distance can be defined for it.
    #[error("no common atoms for residue pair at index {index}")]
    NoCommonAtoms { index: usize },

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the Medusa workspace.
pub type Result<T> = std::result::Result<T, MedusaError>;
