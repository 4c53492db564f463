//! The deformation-profile engine.
//!
//! For every pivot index the comparison conformer is rigidly superimposed on
//! the reference using only that pivot's common atoms, and every pair's mean
//! atom displacement under that fit becomes one matrix row. Each pivot's fit
//! is a pure transform-and-return value, so pivots never observe each
//! other's superposition and the loop can be sharded across workers.

use std::collections::BTreeMap;

use medusa_core::{MedusaError, Result};
use medusa_struct::geometry::centroid_atoms;
use medusa_struct::superposition::fit_rigid_atoms;

use crate::matching::{Correspondence, ResiduePair};
use crate::matrix::ProfileMatrix;
use crate::secondary::Square;

/// Engine tunables, fixed at construction.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProfileOptions {
    /// Divide each cell by the centroid distance between the pivot's and the
    /// measured pair's reference atoms (skipped on the diagonal).
    pub normalize: bool,
}

/// One square's aggregate over the computed matrix.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SquareValue {
    pub square: Square,
    /// Sum over the covered cells.
    pub total: f64,
    /// Number of covered cells.
    pub cells: usize,
    /// Mean over the covered cells.
    pub average: f64,
}

/// The computed deformation profile.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Profile {
    pub matrix: ProfileMatrix,
    /// Residual RMSD of each pivot's own superposition.
    pub local_rmsd: Vec<f64>,
    /// Mean of each matrix row.
    pub row_mean: Vec<f64>,
    /// Mean of each matrix column.
    pub col_mean: Vec<f64>,
    /// Per-square aggregates, in declaration order.
    pub squares: Vec<SquareValue>,
}

impl Profile {
    fn empty() -> Self {
        Self {
            matrix: ProfileMatrix::empty(),
            local_rmsd: Vec::new(),
            row_mean: Vec::new(),
            col_mean: Vec::new(),
            squares: Vec::new(),
        }
    }

    /// Square averages pooled by label: squares sharing a label contribute
    /// their cells to one (sum, count) accumulator. Sorted by label.
    pub fn pooled_square_values(&self) -> BTreeMap<String, f64> {
        let mut totals: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        for sv in &self.squares {
            let entry = totals.entry(sv.square.label.clone()).or_insert((0.0, 0));
            entry.0 += sv.total;
            entry.1 += sv.cells;
        }
        totals
            .into_iter()
            .map(|(label, (total, cells))| (label, total / cells as f64))
            .collect()
    }
}

/// Computes deformation profiles over one correspondence.
#[derive(Debug)]
pub struct ProfileEngine<'a> {
    correspondence: &'a Correspondence,
    squares: Vec<Square>,
    options: ProfileOptions,
}

impl<'a> ProfileEngine<'a> {
    pub fn new(
        correspondence: &'a Correspondence,
        squares: Vec<Square>,
        options: ProfileOptions,
    ) -> Self {
        Self {
            correspondence,
            squares,
            options,
        }
    }

    /// Compute the full profile: matrix, curves, and square aggregates.
    ///
    /// Deterministic for identical inputs. An empty correspondence yields an
    /// empty profile.
    ///
    /// # Errors
    ///
    /// [`MedusaError::NoCommonAtoms`] if any pair has no atoms to measure;
    /// [`MedusaError::Config`] if a square lies outside the matrix.
    pub fn compute(&self) -> Result<Profile> {
        let n = self.correspondence.len();
        if n == 0 {
            return Ok(Profile::empty());
        }

        tracing::debug!(pivots = n, "computing deformation profile");

        #[cfg(feature = "parallel")]
        let per_pivot: Vec<(f64, Vec<f64>)> = {
            use rayon::prelude::*;
            (0..n)
                .into_par_iter()
                .map(|i| self.pivot_row(i))
                .collect::<Result<Vec<_>>>()?
        };

        #[cfg(not(feature = "parallel"))]
        let per_pivot: Vec<(f64, Vec<f64>)> = (0..n)
            .map(|i| self.pivot_row(i))
            .collect::<Result<Vec<_>>>()?;

        let mut local_rmsd = Vec::with_capacity(n);
        let mut rows = Vec::with_capacity(n);
        for (rmsd, row) in per_pivot {
            local_rmsd.push(rmsd);
            rows.push(row);
        }

        let matrix = ProfileMatrix::from_rows(rows);
        let row_mean: Vec<f64> = (0..n).map(|i| matrix.row_mean(i)).collect();
        let col_mean: Vec<f64> = (0..n).map(|j| matrix.col_mean(j)).collect();

        let squares = self.aggregate_squares(&matrix)?;

        Ok(Profile {
            matrix,
            local_rmsd,
            row_mean,
            col_mean,
            squares,
        })
    }

    /// Superimpose on pivot `i` and measure every pair under that fit.
    fn pivot_row(&self, i: usize) -> Result<(f64, Vec<f64>)> {
        let pairs = self.correspondence.pairs();
        let pivot = &pairs[i];
        if pivot.common_atom_count() == 0 {
            return Err(MedusaError::NoCommonAtoms { index: i });
        }

        let fit = fit_rigid_atoms(&pivot.reference.atoms, &pivot.comparison.atoms)?;
        let pivot_centroid = centroid_atoms(&pivot.reference.atoms);

        let mut row = Vec::with_capacity(pairs.len());
        for (j, pair) in pairs.iter().enumerate() {
            if pair.common_atom_count() == 0 {
                return Err(MedusaError::NoCommonAtoms { index: j });
            }

            let mean = mean_displacement(pair, &fit.transform);
            let value = if self.options.normalize && i != j {
                let pair_centroid = centroid_atoms(&pair.reference.atoms);
                mean / pivot_centroid.distance_to(&pair_centroid)
            } else {
                mean
            };
            row.push(value);
        }

        Ok((fit.rmsd, row))
    }

    fn aggregate_squares(&self, matrix: &ProfileMatrix) -> Result<Vec<SquareValue>> {
        self.squares
            .iter()
            .map(|square| {
                if square.c >= matrix.size || square.d >= matrix.size {
                    return Err(MedusaError::Config(format!(
                        "square '{}' ({}, {}) - ({}, {}) exceeds the {}x{} matrix",
                        square.label, square.a, square.b, square.c, square.d, matrix.size,
                        matrix.size
                    )));
                }
                let total = matrix.region_sum(square.a, square.b, square.c, square.d);
                let cells = square.cells();
                Ok(SquareValue {
                    square: square.clone(),
                    total,
                    cells,
                    average: total / cells as f64,
                })
            })
            .collect()
    }
}

/// Mean distance between a pair's reference atoms and its transformed
/// comparison atoms.
fn mean_displacement(pair: &ResiduePair, transform: &medusa_struct::RigidTransform) -> f64 {
    let moved = transform.apply_atoms(&pair.comparison.atoms);
    let sum: f64 = pair
        .reference
        .atoms
        .iter()
        .zip(&moved)
        .map(|(r, m)| r.coords.distance_to(m))
        .sum();
    sum / pair.reference.atoms.len() as f64
}
