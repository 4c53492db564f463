//! Core trait definitions for the Medusa workspace.
//!
//! These traits define the contracts that domain types implement across crates.

/// A type that carries a numeric score (alignment score, fit residual, etc.).
pub trait Scored {
    /// The score value. Higher is better.
    fn score(&self) -> f64;
}

/// A type that carries annotations (names, descriptions, metadata).
pub trait Annotated {
    /// A human-readable name or identifier.
    fn name(&self) -> &str;

    /// An optional description.
    fn description(&self) -> Option<&str> {
        None
    }
}

/// A type that can produce a summary of its contents.
pub trait Summarizable {
    /// A one-line summary suitable for display.
    fn summary(&self) -> String;
}
