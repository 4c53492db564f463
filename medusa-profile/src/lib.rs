//! Deformation profiles for the Medusa comparison toolkit.
//!
//! Compares two conformers of the same chain by superimposing the comparison
//! structure on the reference once per residue pair and recording how far
//! every other pair moves under each fit:
//!
//! - **Correspondence** — ordered residue pairing, explicit or inferred, in
//!   [`matching`]
//! - **Engine** — per-pivot superposition, the N×N matrix, summary curves,
//!   and square aggregates in [`engine`]
//! - **Secondary structure** — helix/loop declarations and their validated
//!   matrix squares in [`secondary`]
//! - **Output** — color banding in [`palette`], SVG rendering in [`render`],
//!   and the `#DP 1.0` text format in [`persist`]
//!
//! # Quick start
//!
//! ```
//! use medusa_align::ScoringWeights;
//! use medusa_profile::engine::{ProfileEngine, ProfileOptions};
//! use medusa_profile::matching::{Correspondence, SourceRef};
//! use medusa_struct::pdb::parse_pdb;
//!
//! let pdb = "\
//! ATOM      1  P     G A   1       0.000   0.000   0.000  1.00  0.00           P
//! ATOM      2  C1'   G A   1       1.000   0.000   0.000  1.00  0.00           C
//! ATOM      3  N1    G A   1       0.000   1.000   0.000  1.00  0.00           N
//! END
//! ";
//! let structure = parse_pdb(pdb).unwrap();
//! let model = structure.model(0).unwrap();
//!
//! let corr = Correspondence::inferred(
//!     model,
//!     model,
//!     &ScoringWeights::default(),
//!     SourceRef::new("ref.pdb", 0),
//!     SourceRef::new("cmp.pdb", 0),
//! );
//! let profile = ProfileEngine::new(&corr, Vec::new(), ProfileOptions::default())
//!     .compute()
//!     .unwrap();
//! assert!(profile.local_rmsd[0] < 1e-9);
//! ```

pub mod engine;
pub mod matching;
pub mod matrix;
pub mod palette;
pub mod persist;
pub mod render;
pub mod secondary;
pub mod svg;

pub use engine::{Profile, ProfileEngine, ProfileOptions, SquareValue};
pub use matching::{AlignmentBlock, Correspondence, MatchedResidue, ResiduePair, SourceRef};
pub use matrix::ProfileMatrix;
pub use palette::Palette;
pub use persist::{matrix_report, write_matrix_report};
pub use render::{RenderOptions, SvgRenderer};
pub use secondary::{
    check_coords, get_lower, get_upper, Element, Helix, Loop, SecondaryStructure, Square,
    SquareSide,
};
