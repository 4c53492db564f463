//! Residue-sequence alignment for the Medusa comparison toolkit.
//!
//! One algorithm lives here: [`align_block`], the gap-free local aligner
//! used to infer residue correspondences between two conformers of the same
//! chain. It is deliberately not a general-purpose aligner; see the module
//! docs in [`block`] for the traceback restriction and its consequences.
//!
//! # Quick start
//!
//! ```
//! use medusa_align::{align_block, ScoringWeights};
//!
//! let block = align_block(&["G", "C", "U"], &["A", "G", "C", "U"], &ScoringWeights::default());
//! assert_eq!(block.length, 3);
//! assert_eq!(block.start2, 1);
//! ```

pub mod block;
pub mod scoring;

pub use block::{align_block, BlockMatch};
pub use scoring::ScoringWeights;
