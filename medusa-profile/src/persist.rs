//! Text persistence of a computed profile.
//!
//! The `#DP 1.0` format is consumed by downstream tooling and must match
//! byte-for-byte: tab separators, three-decimal values, one `SQUARE_VALUE`
//! line per label sorted by label, and a `#eof` tag with no trailing
//! newline.

use std::fmt::Write as _;
use std::path::Path;

use medusa_core::Result;

use crate::engine::Profile;
use crate::matching::Correspondence;

/// Serialize a profile to the `#DP 1.0` text format.
pub fn matrix_report(correspondence: &Correspondence, profile: &Profile) -> String {
    let mut out = String::from("#DP 1.0\n");

    let mut ref_seq = String::new();
    let mut cmp_seq = String::new();
    let mut ref_residues = String::new();
    let mut cmp_residues = String::new();
    for pair in correspondence.pairs() {
        ref_seq.push_str(&pair.reference.name);
        cmp_seq.push_str(&pair.comparison.name);
        let _ = write!(
            ref_residues,
            "({}:{}:'{}')",
            pair.reference.chain, pair.reference.seq_num, pair.reference.name
        );
        let _ = write!(
            cmp_residues,
            "({}:{}:'{}')",
            pair.comparison.chain, pair.comparison.seq_num, pair.comparison.name
        );
    }

    let _ = write!(
        out,
        "REF_PDB\t{}\nREF_MODEL\t{}\n",
        correspondence.reference_source.path, correspondence.reference_source.model
    );
    let _ = writeln!(out, "REF_MODEL_SEQUENCE\t{ref_seq}");
    let _ = writeln!(out, "REF_MODEL_RESIDUES\t{ref_residues}");

    let _ = write!(
        out,
        "CMP_PDB\t{}\nCMP_MODEL\t{}\n",
        correspondence.comparison_source.path, correspondence.comparison_source.model
    );
    let _ = writeln!(out, "CMP_MODEL_SEQUENCE\t{cmp_seq}");
    let _ = writeln!(out, "CMP_MODEL_RESIDUES\t{cmp_residues}");

    let _ = writeln!(out, "LOCAL_RMSD\t{}", join_values(&profile.local_rmsd));
    let _ = writeln!(out, "ROW_MEANS\t{}", join_values(&profile.row_mean));
    let _ = writeln!(out, "COL_MEANS\t{}", join_values(&profile.col_mean));

    for (label, average) in profile.pooled_square_values() {
        let _ = writeln!(out, "SQUARE_VALUE\t'{label}'\t{average:.3}");
    }

    for i in 0..profile.matrix.size {
        let _ = writeln!(out, "ROW_{i}\t{}", join_values(profile.matrix.row(i)));
    }

    out.push_str("#eof");
    out
}

/// Write the report to a file.
pub fn write_matrix_report(
    path: impl AsRef<Path>,
    correspondence: &Correspondence,
    profile: &Profile,
) -> Result<()> {
    std::fs::write(path, matrix_report(correspondence, profile))?;
    Ok(())
}

fn join_values(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{v:.3}"))
        .collect::<Vec<_>>()
        .join("\t")
}
