//! Residue correspondence between a reference and a comparison model.
//!
//! A [`Correspondence`] is the ordered list of residue pairs every other part
//! of the profile works over: its index order defines matrix rows/columns,
//! curve positions, and render order. It is built once per
//! (reference, comparison) pair, either from explicit [`AlignmentBlock`]
//! descriptors or inferred per shared chain with the gap-free aligner, and
//! is immutable afterwards.

use std::collections::HashSet;

use medusa_align::{align_block, ScoringWeights};
use medusa_core::{MedusaError, Result, Summarizable};
use medusa_struct::types::{Atom, Model, Residue};

/// Atom names eligible for distance measurement: standard nucleotide
/// backbone and ring atoms, under both the legacy (`*`) and modern (`'`)
/// naming conventions.
pub const COMPARED_ATOMS: &[&str] = &[
    "C1'", "C1*", "C2'", "C2", "C2*", "C3'", "C3*", "C4'", "C4", "C4*", "C5'", "C5", "C5*", "C6",
    "C8", "N1", "N2", "N3", "N4", "N6", "N7", "N9", "O2'", "O2*", "O2", "O3'", "O3*", "O4'", "O4*",
    "O4", "O5'", "O5*", "O6", "P", "OP1", "OP2",
];

/// Canonical form of an atom name: trimmed, uppercased, `*` rewritten to `'`.
pub fn canonical_atom_name(name: &str) -> String {
    name.trim().to_uppercase().replace('*', "'")
}

/// An explicit correspondence block between two chains.
///
/// `ref_start`/`cmp_start` are residue sequence numbers (file numbering),
/// not list indices; the block covers `length` consecutive numbers on each
/// side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignmentBlock {
    pub length: usize,
    pub ref_chain: char,
    pub ref_start: i32,
    pub cmp_chain: char,
    pub cmp_start: i32,
}

/// Which file and model a correspondence side came from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceRef {
    pub path: String,
    pub model: usize,
}

impl SourceRef {
    pub fn new(path: impl Into<String>, model: usize) -> Self {
        Self {
            path: path.into(),
            model,
        }
    }
}

/// One side of a residue pair: identity plus the common atoms kept for it.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchedResidue {
    pub chain: char,
    pub seq_num: i32,
    pub name: String,
    /// Common atoms, in reference-residue atom order.
    pub atoms: Vec<Atom>,
}

/// A reference/comparison residue pair at one correspondence index.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResiduePair {
    pub reference: MatchedResidue,
    pub comparison: MatchedResidue,
}

impl ResiduePair {
    /// Number of atoms both sides share under the allow-list.
    pub fn common_atom_count(&self) -> usize {
        self.reference.atoms.len()
    }
}

/// The ordered residue correspondence for one (reference, comparison) pair.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Correspondence {
    pub reference_source: SourceRef,
    pub comparison_source: SourceRef,
    pairs: Vec<ResiduePair>,
}

impl Correspondence {
    /// Build from explicit alignment blocks.
    ///
    /// Every block chain must exist in its model and every sequence number in
    /// `[start, start + length)` must resolve to a residue; any miss is a
    /// configuration error and nothing is returned.
    pub fn from_blocks(
        ref_model: &Model,
        cmp_model: &Model,
        blocks: &[AlignmentBlock],
        reference_source: SourceRef,
        comparison_source: SourceRef,
    ) -> Result<Self> {
        let mut pairs = Vec::new();

        for block in blocks {
            let ref_chain = ref_model.get_chain(block.ref_chain).ok_or_else(|| {
                MedusaError::Config(format!(
                    "can't find chain '{}' in reference model",
                    block.ref_chain
                ))
            })?;
            let cmp_chain = cmp_model.get_chain(block.cmp_chain).ok_or_else(|| {
                MedusaError::Config(format!(
                    "can't find chain '{}' in comparison model",
                    block.cmp_chain
                ))
            })?;

            for offset in 0..block.length {
                let ref_pos = block.ref_start + offset as i32;
                let ref_res = ref_chain.residue_by_seq_num(ref_pos).ok_or_else(|| {
                    MedusaError::Config(format!(
                        "can't find residue '{}' in reference chain '{}'",
                        ref_pos, block.ref_chain
                    ))
                })?;

                let cmp_pos = block.cmp_start + offset as i32;
                let cmp_res = cmp_chain.residue_by_seq_num(cmp_pos).ok_or_else(|| {
                    MedusaError::Config(format!(
                        "can't find residue '{}' in comparison chain '{}'",
                        cmp_pos, block.cmp_chain
                    ))
                })?;

                pairs.push(make_pair(
                    block.ref_chain,
                    ref_res,
                    block.cmp_chain,
                    cmp_res,
                ));
            }
        }

        Ok(Self {
            reference_source,
            comparison_source,
            pairs,
        })
    }

    /// Infer the correspondence from the models themselves.
    ///
    /// For every chain id present in both models, the two residue-name
    /// sequences are block-aligned and the resulting pairs appended in model
    /// iteration order. Chains present on only one side are skipped.
    pub fn inferred(
        ref_model: &Model,
        cmp_model: &Model,
        weights: &ScoringWeights,
        reference_source: SourceRef,
        comparison_source: SourceRef,
    ) -> Self {
        let mut pairs = Vec::new();

        for ref_chain in &ref_model.chains {
            for cmp_chain in &cmp_model.chains {
                if ref_chain.id != cmp_chain.id {
                    continue;
                }
                let block = align_block(
                    &ref_chain.residue_names(),
                    &cmp_chain.residue_names(),
                    weights,
                );
                for k in 0..block.length {
                    let ref_res = &ref_chain.residues[block.start1 + k];
                    let cmp_res = &cmp_chain.residues[block.start2 + k];
                    pairs.push(make_pair(ref_chain.id, ref_res, cmp_chain.id, cmp_res));
                }
            }
        }

        Self {
            reference_source,
            comparison_source,
            pairs,
        }
    }

    /// Number of residue pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the correspondence is empty.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// All pairs, in correspondence-index order.
    pub fn pairs(&self) -> &[ResiduePair] {
        &self.pairs
    }

    /// The pair at a correspondence index.
    pub fn pair(&self, index: usize) -> &ResiduePair {
        &self.pairs[index]
    }

    /// Surface composition mismatches between the two sides.
    ///
    /// A pair whose residue names differ means the two conformers are being
    /// compared across different chemistry at that index. This is not fatal
    /// here; the caller decides whether to continue.
    pub fn check_composition(&self) -> Result<()> {
        let mismatched: Vec<String> = self
            .pairs
            .iter()
            .enumerate()
            .filter(|(_, p)| p.reference.name != p.comparison.name)
            .map(|(i, p)| format!("{}:{}≠{}", i, p.reference.name, p.comparison.name))
            .collect();

        if mismatched.is_empty() {
            Ok(())
        } else {
            Err(MedusaError::Mismatch(format!(
                "{} residue pair(s) differ in composition: {}",
                mismatched.len(),
                mismatched.join(", ")
            )))
        }
    }

    /// Multi-line table of the correspondence: index, chain, sequence number,
    /// and residue name for each side.
    pub fn table(&self) -> String {
        let mut index_row = String::new();
        let mut ref_chain_row = String::new();
        let mut ref_id_row = String::new();
        let mut ref_name_row = String::new();
        let mut cmp_chain_row = String::new();
        let mut cmp_id_row = String::new();
        let mut cmp_name_row = String::new();

        for (i, pair) in self.pairs.iter().enumerate() {
            index_row.push_str(&format!("{:>3} ", i));
            ref_chain_row.push_str(&format!("{:>3} ", pair.reference.chain));
            ref_id_row.push_str(&format!("{:>3} ", pair.reference.seq_num));
            ref_name_row.push_str(&format!("{:>3} ", pair.reference.name));
            cmp_chain_row.push_str(&format!("{:>3} ", pair.comparison.chain));
            cmp_id_row.push_str(&format!("{:>3} ", pair.comparison.seq_num));
            cmp_name_row.push_str(&format!("{:>3} ", pair.comparison.name));
        }

        format!(
            "reference:    {}\ncomparison:   {}\n\n\
             ref id:       {}\ncmp id:       {}\n\n\
             ref chain:    {}\ncmp chain:    {}\n\n\
             ref residues: {}\ncmp residues: {}\nalign. index: {}",
            self.reference_source.path,
            self.comparison_source.path,
            ref_id_row,
            cmp_id_row,
            ref_chain_row,
            cmp_chain_row,
            ref_name_row,
            cmp_name_row,
            index_row,
        )
    }
}

impl Summarizable for Correspondence {
    fn summary(&self) -> String {
        format!(
            "Correspondence {} → {} — {} pair(s)",
            self.reference_source.path,
            self.comparison_source.path,
            self.len(),
        )
    }
}

/// Pair two residues, resolving their common atoms.
fn make_pair(ref_chain: char, ref_res: &Residue, cmp_chain: char, cmp_res: &Residue) -> ResiduePair {
    let (ref_atoms, cmp_atoms) = common_atoms(ref_res, cmp_res);
    ResiduePair {
        reference: MatchedResidue {
            chain: ref_chain,
            seq_num: ref_res.seq_num,
            name: ref_res.name.clone(),
            atoms: ref_atoms,
        },
        comparison: MatchedResidue {
            chain: cmp_chain,
            seq_num: cmp_res.seq_num,
            name: cmp_res.name.clone(),
            atoms: cmp_atoms,
        },
    }
}

/// Intersect two residues' atoms against the allow-list.
///
/// Reference atom order is preserved; each reference atom takes the first
/// comparison atom with the same canonical name. A pair with zero common
/// atoms is legal here; the engine raises the degenerate case when it has
/// to divide by the count.
fn common_atoms(ref_res: &Residue, cmp_res: &Residue) -> (Vec<Atom>, Vec<Atom>) {
    let allowed: HashSet<String> = COMPARED_ATOMS
        .iter()
        .map(|n| canonical_atom_name(n))
        .collect();

    let cmp_candidates: Vec<(&Atom, String)> = cmp_res
        .atoms
        .iter()
        .map(|a| (a, canonical_atom_name(&a.name)))
        .filter(|(_, canon)| allowed.contains(canon))
        .collect();

    let mut ref_atoms = Vec::new();
    let mut cmp_atoms = Vec::new();
    for ref_atom in &ref_res.atoms {
        let canon = canonical_atom_name(&ref_atom.name);
        if !allowed.contains(&canon) {
            continue;
        }
        if let Some((cmp_atom, _)) = cmp_candidates.iter().find(|(_, c)| *c == canon) {
            ref_atoms.push(ref_atom.clone());
            cmp_atoms.push((*cmp_atom).clone());
        }
    }

    (ref_atoms, cmp_atoms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use medusa_struct::types::{Chain, Point3D};

    fn make_atom(name: &str, x: f64) -> Atom {
        Atom {
            serial: 1,
            name: name.into(),
            coords: Point3D::new(x, 0.0, 0.0),
            occupancy: 1.0,
            temp_factor: 0.0,
            element: None,
            is_hetatm: false,
        }
    }

    fn make_residue(name: &str, seq_num: i32, atom_names: &[&str]) -> Residue {
        Residue {
            name: name.into(),
            seq_num,
            i_code: None,
            atoms: atom_names
                .iter()
                .enumerate()
                .map(|(i, n)| make_atom(n, i as f64))
                .collect(),
        }
    }

    fn model_of(chains: Vec<Chain>) -> Model {
        Model { serial: 0, chains }
    }

    fn src(path: &str) -> SourceRef {
        SourceRef::new(path, 0)
    }

    #[test]
    fn canonical_name_normalizes_conventions() {
        assert_eq!(canonical_atom_name("C1*"), "C1'");
        assert_eq!(canonical_atom_name(" c1' "), "C1'");
        assert_eq!(canonical_atom_name("P"), "P");
    }

    #[test]
    fn explicit_block_resolves_by_seq_num() {
        let ref_model = model_of(vec![Chain::new(
            'A',
            vec![
                make_residue("G", 10, &["P", "C1'", "N1"]),
                make_residue("C", 11, &["P", "C1'", "N1"]),
            ],
        )]);
        let cmp_model = model_of(vec![Chain::new(
            'B',
            vec![
                make_residue("G", 20, &["P", "C1'", "N1"]),
                make_residue("C", 21, &["P", "C1'", "N1"]),
            ],
        )]);

        let blocks = [AlignmentBlock {
            length: 2,
            ref_chain: 'A',
            ref_start: 10,
            cmp_chain: 'B',
            cmp_start: 20,
        }];
        let corr =
            Correspondence::from_blocks(&ref_model, &cmp_model, &blocks, src("r"), src("c"))
                .unwrap();

        assert_eq!(corr.len(), 2);
        assert_eq!(corr.pair(0).reference.seq_num, 10);
        assert_eq!(corr.pair(0).comparison.seq_num, 20);
        assert_eq!(corr.pair(1).reference.name, "C");
        assert_eq!(corr.pair(0).common_atom_count(), 3);
    }

    #[test]
    fn explicit_block_unknown_chain_is_config_error() {
        let model = model_of(vec![Chain::new('A', vec![make_residue("G", 1, &["P"])])]);
        let blocks = [AlignmentBlock {
            length: 1,
            ref_chain: 'Q',
            ref_start: 1,
            cmp_chain: 'A',
            cmp_start: 1,
        }];
        let err = Correspondence::from_blocks(&model, &model, &blocks, src("r"), src("c"))
            .unwrap_err();
        assert!(matches!(err, MedusaError::Config(_)));
        assert!(err.to_string().contains("'Q'"));
    }

    #[test]
    fn explicit_block_unresolvable_offset_is_config_error() {
        let model = model_of(vec![Chain::new(
            'A',
            vec![make_residue("G", 1, &["P"]), make_residue("C", 2, &["P"])],
        )]);
        // length 3 runs past seq_num 2
        let blocks = [AlignmentBlock {
            length: 3,
            ref_chain: 'A',
            ref_start: 1,
            cmp_chain: 'A',
            cmp_start: 1,
        }];
        let err = Correspondence::from_blocks(&model, &model, &blocks, src("r"), src("c"))
            .unwrap_err();
        assert!(err.to_string().contains("residue '3'"));
    }

    #[test]
    fn inferred_mode_pairs_shared_chains_only() {
        let ref_model = model_of(vec![
            Chain::new(
                'A',
                vec![
                    make_residue("G", 1, &["C1'"]),
                    make_residue("C", 2, &["C1'"]),
                    make_residue("U", 3, &["C1'"]),
                ],
            ),
            Chain::new('X', vec![make_residue("A", 1, &["C1'"])]),
        ]);
        let cmp_model = model_of(vec![Chain::new(
            'A',
            vec![
                make_residue("G", 7, &["C1'"]),
                make_residue("C", 8, &["C1'"]),
                make_residue("U", 9, &["C1'"]),
            ],
        )]);

        let corr = Correspondence::inferred(
            &ref_model,
            &cmp_model,
            &ScoringWeights::default(),
            src("r"),
            src("c"),
        );
        // chain X has no partner and is skipped
        assert_eq!(corr.len(), 3);
        assert_eq!(corr.pair(0).reference.seq_num, 1);
        assert_eq!(corr.pair(0).comparison.seq_num, 7);
        assert!(corr.check_composition().is_ok());
    }

    #[test]
    fn common_atoms_bridge_naming_conventions() {
        // Legacy '*' names on one side, modern on the other, scrambled order
        // plus a non-allow-listed atom on each side.
        let ref_res = make_residue("G", 1, &["P", "C1*", "O2*", "FE"]);
        let cmp_res = make_residue("G", 1, &["O2'", "C1'", "P", "ZN"]);
        let (ra, ca) = common_atoms(&ref_res, &cmp_res);

        let ref_names: Vec<&str> = ra.iter().map(|a| a.name.as_str()).collect();
        let cmp_names: Vec<&str> = ca.iter().map(|a| a.name.as_str()).collect();
        // Reference order is preserved; names matched across conventions.
        assert_eq!(ref_names, vec!["P", "C1*", "O2*"]);
        assert_eq!(cmp_names, vec!["P", "C1'", "O2'"]);
    }

    #[test]
    fn zero_common_atoms_is_legal_here() {
        let ref_res = make_residue("G", 1, &["FE"]);
        let cmp_res = make_residue("G", 1, &["ZN"]);
        let (ra, ca) = common_atoms(&ref_res, &cmp_res);
        assert!(ra.is_empty() && ca.is_empty());
    }

    #[test]
    fn composition_mismatch_is_surfaced_not_fatal() {
        let ref_model = model_of(vec![Chain::new('A', vec![make_residue("G", 1, &["C1'"])])]);
        let cmp_model = model_of(vec![Chain::new('A', vec![make_residue("U", 1, &["C1'"])])]);
        let blocks = [AlignmentBlock {
            length: 1,
            ref_chain: 'A',
            ref_start: 1,
            cmp_chain: 'A',
            cmp_start: 1,
        }];
        let corr =
            Correspondence::from_blocks(&ref_model, &cmp_model, &blocks, src("r"), src("c"))
                .unwrap();
        let err = corr.check_composition().unwrap_err();
        assert!(matches!(err, MedusaError::Mismatch(_)));
    }

    #[test]
    fn table_lists_every_index() {
        let model = model_of(vec![Chain::new(
            'A',
            vec![make_residue("G", 1, &["C1'"]), make_residue("C", 2, &["C1'"])],
        )]);
        let corr = Correspondence::inferred(
            &model,
            &model,
            &ScoringWeights::default(),
            src("ref.pdb"),
            src("cmp.pdb"),
        );
        let table = corr.table();
        assert!(table.contains("ref.pdb"));
        assert!(table.contains("align. index"));
        assert!(table.contains("  0   1 "));
    }
}
