//! Macromolecular 3D structures for the Medusa comparison toolkit.
//!
//! - **PDB parsing** — read multi-model structure files with [`pdb::parse_pdb`]
//! - **Coordinate geometry** — centroids and distances in [`geometry`]
//! - **Superposition** — least-squares rigid-body fitting in [`superposition`]
//!
//! # Quick start
//!
//! ```
//! use medusa_struct::pdb::parse_pdb;
//!
//! let pdb_text = "\
//! HEADER                                                        1TST
//! ATOM      1  P     G A   1       1.000   2.000   3.000  1.00  0.00           P
//! ATOM      2  C1'   G A   1       2.000   2.000   3.000  1.00  0.00           C
//! TER
//! END
//! ";
//!
//! let structure = parse_pdb(pdb_text).unwrap();
//! assert_eq!(structure.model_count(), 1);
//! assert_eq!(structure.model(0).unwrap().get_chain('A').unwrap().residue_count(), 1);
//! ```

pub mod geometry;
mod linalg;
pub mod pdb;
pub mod superposition;
pub mod types;

pub use geometry::{centroid, centroid_atoms};
pub use pdb::{parse_pdb, parse_pdb_file};
pub use superposition::{fit_rigid, fit_rigid_atoms, FitResult, RigidTransform};
pub use types::{Atom, Chain, Model, Point3D, Residue, Structure};
