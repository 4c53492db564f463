//! Least-squares rigid-body superposition (Kabsch).
//!
//! [`fit_rigid`] finds the rotation + translation minimizing the RMSD between
//! a fixed and a mobile point set and returns it as a [`RigidTransform`]
//! value. Nothing is mutated: callers apply the transform to whatever
//! coordinates they choose. This keeps concurrent fits over a shared mobile
//! structure sound.

use medusa_core::{MedusaError, Result, Scored};

use crate::geometry::centroid;
use crate::linalg::{svd3, Mat3};
use crate::types::{Atom, Point3D};

/// A proper rigid-body transform: rotation followed by translation.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RigidTransform {
    /// 3x3 rotation matrix (row-major).
    pub rotation: [[f64; 3]; 3],
    /// Translation applied after rotation.
    pub translation: Point3D,
}

impl RigidTransform {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            translation: Point3D::zero(),
        }
    }

    /// Apply to a single point: R * p + t.
    pub fn apply(&self, p: &Point3D) -> Point3D {
        let r = Mat3 { m: self.rotation };
        r.apply(p).add(&self.translation)
    }

    /// Apply to every point in a slice, returning fresh coordinates.
    pub fn apply_all(&self, points: &[Point3D]) -> Vec<Point3D> {
        points.iter().map(|p| self.apply(p)).collect()
    }

    /// Apply to the coordinates of a slice of atoms.
    pub fn apply_atoms(&self, atoms: &[Atom]) -> Vec<Point3D> {
        atoms.iter().map(|a| self.apply(&a.coords)).collect()
    }
}

/// Result of a rigid-body fit.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitResult {
    /// Transform that superimposes the mobile set onto the fixed set.
    pub transform: RigidTransform,
    /// RMSD of the mobile set after superposition.
    pub rmsd: f64,
}

impl Scored for FitResult {
    fn score(&self) -> f64 {
        -self.rmsd
    }
}

/// Least-squares rigid fit of `mobile` onto `fixed`.
///
/// # Errors
///
/// Returns an error if the sets differ in size or have fewer than 3 points
/// (the rotation is under-determined below that).
pub fn fit_rigid(fixed: &[Point3D], mobile: &[Point3D]) -> Result<FitResult> {
    if fixed.len() != mobile.len() {
        return Err(MedusaError::InvalidInput(format!(
            "point set sizes differ: {} vs {}",
            fixed.len(),
            mobile.len()
        )));
    }
    if fixed.len() < 3 {
        return Err(MedusaError::InvalidInput(
            "need at least 3 points for a rigid fit".into(),
        ));
    }

    let n = fixed.len();
    let com_f = centroid(fixed);
    let com_m = centroid(mobile);

    let centered_f: Vec<Point3D> = fixed.iter().map(|p| p.sub(&com_f)).collect();
    let centered_m: Vec<Point3D> = mobile.iter().map(|p| p.sub(&com_m)).collect();

    // Cross-covariance H = M^T * F over the centered sets.
    let mut h = Mat3::zeros();
    for i in 0..n {
        let p = &centered_m[i];
        let q = &centered_f[i];
        h.m[0][0] += p.x * q.x;
        h.m[0][1] += p.x * q.y;
        h.m[0][2] += p.x * q.z;
        h.m[1][0] += p.y * q.x;
        h.m[1][1] += p.y * q.y;
        h.m[1][2] += p.y * q.z;
        h.m[2][0] += p.z * q.x;
        h.m[2][1] += p.z * q.y;
        h.m[2][2] += p.z * q.z;
    }

    // R = V * U^T, with a reflection fix when det < 0.
    let svd = svd3(&h);
    let v = svd.vt.transpose();
    let ut = svd.u.transpose();
    let mut r = v.mul(&ut);
    if r.det() < 0.0 {
        let mut v_fixed = v;
        for row in 0..3 {
            v_fixed.m[row][2] = -v_fixed.m[row][2];
        }
        r = v_fixed.mul(&ut);
    }

    let translation = com_f.sub(&r.apply(&com_m));
    let transform = RigidTransform {
        rotation: r.m,
        translation,
    };

    let mut sum_sq = 0.0;
    for i in 0..n {
        let moved = transform.apply(&mobile[i]);
        let diff = moved.sub(&fixed[i]);
        sum_sq += diff.dot(&diff);
    }
    let rmsd = (sum_sq / n as f64).sqrt();

    Ok(FitResult { transform, rmsd })
}

/// Rigid fit on atom coordinates; `fixed` is the reference set, `mobile` gets
/// superimposed.
pub fn fit_rigid_atoms(fixed: &[Atom], mobile: &[Atom]) -> Result<FitResult> {
    let f: Vec<Point3D> = fixed.iter().map(|a| a.coords).collect();
    let m: Vec<Point3D> = mobile.iter().map(|a| a.coords).collect();
    fit_rigid(&f, &m)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_tetrahedron() -> Vec<Point3D> {
        vec![
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(1.0, 0.0, 0.0),
            Point3D::new(0.0, 1.0, 0.0),
            Point3D::new(0.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn identical_sets_fit_with_zero_rmsd() {
        let pts = unit_tetrahedron();
        let fit = fit_rigid(&pts, &pts).unwrap();
        assert!(fit.rmsd < 1e-6, "rmsd was {}", fit.rmsd);
    }

    #[test]
    fn translated_set_fits_exactly() {
        let fixed = unit_tetrahedron();
        let shift = Point3D::new(10.0, -20.0, 5.0);
        let mobile: Vec<Point3D> = fixed.iter().map(|p| p.add(&shift)).collect();
        let fit = fit_rigid(&fixed, &mobile).unwrap();
        assert!(fit.rmsd < 1e-6);

        // The returned transform moves mobile points back onto fixed.
        for (f, m) in fixed.iter().zip(&mobile) {
            assert!(fit.transform.apply(m).distance_to(f) < 1e-6);
        }
    }

    #[test]
    fn rotated_set_fits_exactly() {
        // 90 degrees around Z
        let fixed = vec![
            Point3D::new(1.0, 0.0, 0.0),
            Point3D::new(0.0, 1.0, 0.0),
            Point3D::new(-1.0, 0.0, 0.0),
            Point3D::new(0.0, -1.0, 0.0),
        ];
        let mobile = vec![
            Point3D::new(0.0, 1.0, 0.0),
            Point3D::new(-1.0, 0.0, 0.0),
            Point3D::new(0.0, -1.0, 0.0),
            Point3D::new(1.0, 0.0, 0.0),
        ];
        let fit = fit_rigid(&fixed, &mobile).unwrap();
        assert!(fit.rmsd < 1e-6);
    }

    #[test]
    fn fit_does_not_mutate_inputs() {
        let fixed = unit_tetrahedron();
        let mobile: Vec<Point3D> = fixed
            .iter()
            .map(|p| p.add(&Point3D::new(3.0, 0.0, 0.0)))
            .collect();
        let before = mobile.clone();
        let _ = fit_rigid(&fixed, &mobile).unwrap();
        assert_eq!(mobile, before);
    }

    #[test]
    fn mismatched_sizes_error() {
        let a = vec![Point3D::zero(); 3];
        let b = vec![Point3D::zero(); 4];
        assert!(fit_rigid(&a, &b).is_err());
    }

    #[test]
    fn too_few_points_error() {
        let a = vec![Point3D::zero(); 2];
        assert!(fit_rigid(&a, &a).is_err());
    }
}
