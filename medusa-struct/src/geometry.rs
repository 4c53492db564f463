//! Coordinate geometry helpers shared by superposition and profile code.

use crate::types::{Atom, Point3D};

/// Unweighted geometric center of a point set. Returns the origin for an
/// empty set.
pub fn centroid(points: &[Point3D]) -> Point3D {
    if points.is_empty() {
        return Point3D::zero();
    }
    let mut sum = Point3D::zero();
    for p in points {
        sum = sum.add(p);
    }
    sum.scale(1.0 / points.len() as f64)
}

/// Centroid of a set of atoms.
pub fn centroid_atoms(atoms: &[Atom]) -> Point3D {
    let coords: Vec<Point3D> = atoms.iter().map(|a| a.coords).collect();
    centroid(&coords)
}
