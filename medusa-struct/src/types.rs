//! Core types for macromolecular 3D structure representation.
//!
//! A [`Structure`] is a stack of [`Model`]s (conformers), each holding
//! [`Chain`]s of [`Residue`]s of [`Atom`]s. Multi-model files are common for
//! NMR ensembles and prediction decoys, and the comparison pipeline selects
//! one model per file by ordinal index.

use medusa_core::{Annotated, Summarizable};

/// A point in 3D Cartesian space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    /// Create a new point.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The origin.
    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point3D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Dot product.
    pub fn dot(&self, other: &Point3D) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product.
    pub fn cross(&self, other: &Point3D) -> Point3D {
        Point3D {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Vector magnitude.
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or zero if magnitude is zero.
    pub fn normalize(&self) -> Point3D {
        let n = self.norm();
        if n < 1e-15 {
            Point3D::zero()
        } else {
            self.scale(1.0 / n)
        }
    }

    /// Vector addition.
    pub fn add(&self, other: &Point3D) -> Point3D {
        Point3D {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }

    /// Vector subtraction.
    pub fn sub(&self, other: &Point3D) -> Point3D {
        Point3D {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    /// Scalar multiplication.
    pub fn scale(&self, s: f64) -> Point3D {
        Point3D {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }
}

/// A single atom in a macromolecular structure.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Atom {
    /// Atom serial number.
    pub serial: u32,
    /// Atom name as it appears in the file (e.g. "C1'", "P", "N1"),
    /// whitespace-trimmed.
    pub name: String,
    /// 3D coordinates in Angstroms.
    pub coords: Point3D,
    /// Occupancy factor.
    pub occupancy: f64,
    /// Temperature factor (B-factor).
    pub temp_factor: f64,
    /// Element symbol.
    pub element: Option<String>,
    /// Whether this is a HETATM record.
    pub is_hetatm: bool,
}

/// A residue (nucleotide or amino acid) in a chain.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Residue {
    /// Residue name (e.g. "G", "C", "ALA"), whitespace-trimmed.
    pub name: String,
    /// Sequence number from the file.
    pub seq_num: i32,
    /// Insertion code.
    pub i_code: Option<char>,
    /// Atoms belonging to this residue.
    pub atoms: Vec<Atom>,
}

impl Residue {
    /// Get an atom by exact name, returning the first match.
    pub fn get_atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.name == name)
    }

    /// Geometric center (unweighted) of all atoms.
    pub fn centroid(&self) -> Point3D {
        crate::geometry::centroid(&self.atoms.iter().map(|a| a.coords).collect::<Vec<_>>())
    }
}

impl Annotated for Residue {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A polynucleotide or polypeptide chain.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chain {
    /// Single-character chain identifier.
    pub id: char,
    /// Residues in this chain, in file order.
    pub residues: Vec<Residue>,
}

impl Chain {
    /// Create a new chain.
    pub fn new(id: char, residues: Vec<Residue>) -> Self {
        Self { id, residues }
    }

    /// Number of residues.
    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    /// Total number of atoms across all residues.
    pub fn atom_count(&self) -> usize {
        self.residues.iter().map(|r| r.atoms.len()).sum()
    }

    /// The residue-name sequence of this chain, in file order.
    pub fn residue_names(&self) -> Vec<&str> {
        self.residues.iter().map(|r| r.name.as_str()).collect()
    }

    /// Look up a residue by its file sequence number.
    ///
    /// Returns the first residue with that number; insertion codes are not
    /// distinguished.
    pub fn residue_by_seq_num(&self, seq_num: i32) -> Option<&Residue> {
        self.residues.iter().find(|r| r.seq_num == seq_num)
    }
}

/// One conformer of a structure: a set of chains.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Model {
    /// MODEL record serial number, or 0 for files without MODEL records.
    pub serial: i32,
    /// Chains in this model.
    pub chains: Vec<Chain>,
}

impl Model {
    /// Get a chain by its single-character ID.
    pub fn get_chain(&self, id: char) -> Option<&Chain> {
        self.chains.iter().find(|c| c.id == id)
    }

    /// Total residues across all chains.
    pub fn residue_count(&self) -> usize {
        self.chains.iter().map(|c| c.residue_count()).sum()
    }

    /// Total atoms across all chains.
    pub fn atom_count(&self) -> usize {
        self.chains.iter().map(|c| c.atom_count()).sum()
    }
}

/// A complete macromolecular structure: one or more models.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Structure {
    /// PDB identifier or user-supplied name.
    pub id: String,
    /// Models in file order. Never empty for a successfully parsed file.
    pub models: Vec<Model>,
}

impl Structure {
    /// Number of models.
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Get a model by ordinal index (not MODEL serial).
    pub fn model(&self, index: usize) -> Option<&Model> {
        self.models.get(index)
    }
}

impl Annotated for Structure {
    fn name(&self) -> &str {
        &self.id
    }
}

impl Summarizable for Structure {
    fn summary(&self) -> String {
        let residues: usize = self.models.first().map(|m| m.residue_count()).unwrap_or(0);
        format!(
            "Structure {} — {} model(s), {} residue(s) in model 0",
            self.id,
            self.model_count(),
            residues,
        )
    }
}
