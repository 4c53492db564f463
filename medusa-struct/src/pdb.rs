//! PDB format parser.
//!
//! Parses ATOM, HETATM, TER, HEADER, and MODEL/ENDMDL records from PDB-format
//! text. All models are kept: comparison pipelines select conformers from NMR
//! ensembles and prediction archives by model index.

use medusa_core::{MedusaError, Result};

use crate::types::{Atom, Chain, Model, Point3D, Residue, Structure};

/// Accumulates atoms → residues → chains for the model being read.
#[derive(Default)]
struct ModelBuilder {
    chains: Vec<Chain>,
    residues: Vec<Residue>,
    atoms: Vec<Atom>,
    chain_id: Option<char>,
    residue_key: Option<(i32, Option<char>, String)>,
}

impl ModelBuilder {
    fn flush_residue(&mut self) {
        if let Some((seq_num, i_code, name)) = self.residue_key.take() {
            if !self.atoms.is_empty() {
                self.residues.push(Residue {
                    name,
                    seq_num,
                    i_code,
                    atoms: std::mem::take(&mut self.atoms),
                });
            }
        }
    }

    fn flush_chain(&mut self) {
        self.flush_residue();
        if let Some(id) = self.chain_id.take() {
            if !self.residues.is_empty() {
                self.chains
                    .push(Chain::new(id, std::mem::take(&mut self.residues)));
            }
        }
    }

    fn finish(&mut self, serial: i32) -> Option<Model> {
        self.flush_chain();
        if self.chains.is_empty() {
            return None;
        }
        Some(Model {
            serial,
            chains: std::mem::take(&mut self.chains),
        })
    }
}

/// Parse a PDB-format string into a [`Structure`].
///
/// # Errors
///
/// Returns an error if no ATOM records are found or if an ATOM record is
/// malformed (wrong column widths, unparseable coordinates).
pub fn parse_pdb(input: &str) -> Result<Structure> {
    let mut id = String::from("UNKN");
    let mut models: Vec<Model> = Vec::new();
    let mut builder = ModelBuilder::default();
    let mut model_serial = 0i32;
    let mut atom_count = 0u64;

    for line in input.lines() {
        if line.starts_with("HEADER") && line.len() >= 66 {
            let pdb_id = slice_cols(line, 62, 66).trim();
            if !pdb_id.is_empty() {
                id = pdb_id.into();
            }
            continue;
        }

        if line.starts_with("MODEL") {
            // Tolerate a missing ENDMDL on the previous model.
            if let Some(model) = builder.finish(model_serial) {
                models.push(model);
            }
            model_serial = slice_cols(line, 10, 14)
                .trim()
                .parse::<i32>()
                .unwrap_or(models.len() as i32 + 1);
            continue;
        }

        if line.starts_with("ENDMDL") {
            if let Some(model) = builder.finish(model_serial) {
                models.push(model);
            }
            continue;
        }

        if line.starts_with("TER") {
            builder.flush_chain();
            continue;
        }

        let is_atom = line.starts_with("ATOM  ");
        let is_hetatm = line.starts_with("HETATM");
        if !(is_atom || is_hetatm) {
            continue;
        }

        let atom = parse_atom_record(line, is_hetatm)?;
        atom_count += 1;

        let chain_id = slice_cols(line, 21, 22).chars().next().unwrap_or(' ');
        let seq_num = slice_cols(line, 22, 26)
            .trim()
            .parse::<i32>()
            .map_err(|e| MedusaError::Parse(format!("bad residue seq number: {e}")))?;
        let i_code = match slice_cols(line, 26, 27).chars().next().unwrap_or(' ') {
            ' ' => None,
            c => Some(c),
        };
        let res_name = slice_cols(line, 17, 20).trim().to_string();
        let res_key = (seq_num, i_code, res_name);

        if builder.chain_id != Some(chain_id) {
            builder.flush_chain();
            builder.chain_id = Some(chain_id);
            builder.residue_key = Some(res_key);
        } else if builder.residue_key.as_ref() != Some(&res_key) {
            builder.flush_residue();
            builder.residue_key = Some(res_key);
        }

        builder.atoms.push(atom);
    }

    if let Some(model) = builder.finish(model_serial) {
        models.push(model);
    }

    if atom_count == 0 {
        return Err(MedusaError::Parse("no ATOM records found".into()));
    }

    Ok(Structure { id, models })
}

/// Parse a PDB file from disk.
pub fn parse_pdb_file(path: impl AsRef<std::path::Path>) -> Result<Structure> {
    let contents = std::fs::read_to_string(path)?;
    parse_pdb(&contents)
}

fn parse_atom_record(line: &str, is_hetatm: bool) -> Result<Atom> {
    // Fixed-width columns; coordinates end at column 54.
    if line.len() < 54 {
        return Err(MedusaError::Parse(format!(
            "ATOM record too short ({} chars): {}",
            line.len(),
            line
        )));
    }

    let serial = slice_cols(line, 6, 11)
        .trim()
        .parse::<u32>()
        .map_err(|e| MedusaError::Parse(format!("bad atom serial: {e}")))?;

    let name = slice_cols(line, 12, 16).trim().to_string();

    let x = parse_coord(line, 30, 38, "x")?;
    let y = parse_coord(line, 38, 46, "y")?;
    let z = parse_coord(line, 46, 54, "z")?;

    let occupancy = if line.len() >= 60 {
        slice_cols(line, 54, 60).trim().parse::<f64>().unwrap_or(1.0)
    } else {
        1.0
    };

    let temp_factor = if line.len() >= 66 {
        slice_cols(line, 60, 66).trim().parse::<f64>().unwrap_or(0.0)
    } else {
        0.0
    };

    let element = if line.len() >= 78 {
        let e = slice_cols(line, 76, 78).trim();
        if e.is_empty() {
            None
        } else {
            Some(e.to_string())
        }
    } else {
        None
    };

    Ok(Atom {
        serial,
        name,
        coords: Point3D::new(x, y, z),
        occupancy,
        temp_factor,
        element,
        is_hetatm,
    })
}

fn parse_coord(line: &str, start: usize, end: usize, axis: &str) -> Result<f64> {
    slice_cols(line, start, end)
        .trim()
        .parse::<f64>()
        .map_err(|e| MedusaError::Parse(format!("bad {axis} coordinate: {e}")))
}

/// Safe substring that handles short lines gracefully. PDB files are ASCII,
/// so byte offsets are char boundaries.
fn slice_cols(s: &str, start: usize, end: usize) -> &str {
    let len = s.len();
    if start >= len {
        return "";
    }
    &s[start..end.min(len)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_model_pdb() -> &'static str {
        "\
HEADER                                                        1TST\n\
ATOM      1  P     G A   1       1.000   2.000   3.000  1.00  0.00           P\n\
ATOM      2  C1'   G A   1       2.000   2.000   3.000  1.00  0.00           C\n\
ATOM      3  N1    G A   1       3.000   2.000   3.000  1.00  0.00           N\n\
ATOM      4  P     C A   2       4.000   2.000   3.000  1.00  0.00           P\n\
ATOM      5  C1'   C A   2       5.000   2.000   3.000  1.00  0.00           C\n\
TER\n\
END\n"
    }

    #[test]
    fn parse_single_model() {
        let s = parse_pdb(single_model_pdb()).unwrap();
        assert_eq!(s.id, "1TST");
        assert_eq!(s.model_count(), 1);
        let model = s.model(0).unwrap();
        assert_eq!(model.serial, 0);
        let chain = model.get_chain('A').unwrap();
        assert_eq!(chain.residue_count(), 2);
        assert_eq!(chain.residues[0].name, "G");
        assert_eq!(chain.residues[0].atoms[1].name, "C1'");
        assert_eq!(chain.residues[1].seq_num, 2);
    }

    #[test]
    fn parse_multi_model() {
        let input = "\
MODEL        1\n\
ATOM      1  C1'   G A   1       1.000   2.000   3.000  1.00  0.00           C\n\
ENDMDL\n\
MODEL        2\n\
ATOM      1  C1'   G A   1       9.000   2.000   3.000  1.00  0.00           C\n\
ENDMDL\n\
END\n";
        let s = parse_pdb(input).unwrap();
        assert_eq!(s.model_count(), 2);
        assert_eq!(s.model(0).unwrap().serial, 1);
        assert_eq!(s.model(1).unwrap().serial, 2);
        let x0 = s.model(0).unwrap().chains[0].residues[0].atoms[0].coords.x;
        let x1 = s.model(1).unwrap().chains[0].residues[0].atoms[0].coords.x;
        assert!((x0 - 1.0).abs() < 1e-10);
        assert!((x1 - 9.0).abs() < 1e-10);
    }

    #[test]
    fn missing_endmdl_is_tolerated() {
        let input = "\
MODEL        1\n\
ATOM      1  C1'   G A   1       1.000   2.000   3.000  1.00  0.00           C\n\
MODEL        2\n\
ATOM      1  C1'   G A   1       9.000   2.000   3.000  1.00  0.00           C\n\
END\n";
        let s = parse_pdb(input).unwrap();
        assert_eq!(s.model_count(), 2);
    }

    #[test]
    fn parse_multi_chain() {
        let input = "\
ATOM      1  C1'   G A   1       1.000   2.000   3.000  1.00  0.00           C\n\
TER\n\
ATOM      2  C1'   U B   1       4.000   5.000   6.000  1.00  0.00           C\n\
TER\n\
END\n";
        let s = parse_pdb(input).unwrap();
        let model = s.model(0).unwrap();
        assert_eq!(model.chains.len(), 2);
        assert!(model.get_chain('A').is_some());
        assert!(model.get_chain('B').is_some());
    }

    #[test]
    fn parse_hetatm_flag() {
        let input = "\
ATOM      1  C1'   G A   1       1.000   2.000   3.000  1.00  0.00           C\n\
HETATM    2  O   HOH A   2       4.000   5.000   6.000  1.00  0.00           O\n\
END\n";
        let s = parse_pdb(input).unwrap();
        let chain = &s.model(0).unwrap().chains[0];
        assert_eq!(chain.residue_count(), 2);
        assert!(chain.residues[1].atoms[0].is_hetatm);
    }

    #[test]
    fn no_atoms_is_an_error() {
        assert!(parse_pdb("HEADER only\nEND\n").is_err());
    }

    #[test]
    fn malformed_record_is_an_error() {
        assert!(parse_pdb("ATOM   BAD\n").is_err());
    }
}
