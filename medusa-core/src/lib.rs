//! Shared primitives for the Medusa structure-comparison toolkit.
//!
//! `medusa-core` provides the foundation that the other Medusa crates build on:
//!
//! - **Error types** — [`MedusaError`] and [`Result`] for structured error handling
//! - **Traits** — [`Annotated`], [`Summarizable`], [`Scored`]

pub mod error;
pub mod traits;

pub use error::{MedusaError, Result};
pub use traits::*;
