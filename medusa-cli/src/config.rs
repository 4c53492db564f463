//! TOML run configuration.
//!
//! Declares everything one profile run needs: the reference and comparison
//! structures, optional explicit alignment blocks, the secondary-structure
//! elements with their draw keys, and output toggles. The loader translates
//! the file into core entity types and validates paths up front, so the
//! engine only ever sees resolvable inputs.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use medusa_core::{MedusaError, Result};
use medusa_profile::matching::AlignmentBlock;
use medusa_profile::secondary::{Element, Helix, Loop, SecondaryStructure, Square, SquareSide};

/// One structure file plus the model index to take from it.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructureEntry {
    pub path: PathBuf,
    #[serde(default)]
    pub model: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlignmentEntry {
    pub length: usize,
    pub ref_chain: String,
    pub ref_start: i32,
    pub cmp_chain: String,
    pub cmp_start: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HelixEntry {
    pub name: String,
    pub i: usize,
    pub ni: usize,
    pub j: usize,
    pub nj: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoopEntry {
    pub name: String,
    pub i: usize,
    pub n: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputToggles {
    #[serde(default = "default_true")]
    pub matrix: bool,
    #[serde(default = "default_true")]
    pub svg: bool,
}

impl Default for OutputToggles {
    fn default() -> Self {
        Self {
            matrix: true,
            svg: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_out_dir() -> PathBuf {
    PathBuf::from(".")
}

/// The full run configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default)]
    pub normalize: bool,
    pub reference: StructureEntry,
    #[serde(default, rename = "comparison")]
    pub comparisons: Vec<StructureEntry>,
    #[serde(default)]
    pub comparison_list: Option<PathBuf>,
    #[serde(default, rename = "alignment")]
    pub alignments: Vec<AlignmentEntry>,
    #[serde(default, rename = "helix")]
    pub helices: Vec<HelixEntry>,
    #[serde(default, rename = "loop")]
    pub loops: Vec<LoopEntry>,
    #[serde(default)]
    pub draw: Vec<String>,
    #[serde(default)]
    pub output: OutputToggles,
}

impl RunConfig {
    /// Load and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            MedusaError::Config(format!("can't read config '{}': {e}", path.display()))
        })?;
        Self::parse(&text)
    }

    /// Parse configuration text.
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| MedusaError::Config(format!("bad config: {e}")))
    }

    /// Check the filesystem-facing parts of the config.
    pub fn validate(&self) -> Result<()> {
        if !self.out_dir.is_dir() {
            return Err(MedusaError::Config(format!(
                "output directory not found: '{}' — check 'out_dir'",
                self.out_dir.display()
            )));
        }
        if !self.reference.path.is_file() {
            return Err(MedusaError::Config(format!(
                "reference file not found: '{}' — check 'reference'",
                self.reference.path.display()
            )));
        }
        if !self.output.matrix && !self.output.svg {
            return Err(MedusaError::Config(
                "nothing to do — check 'output.matrix' and 'output.svg'".into(),
            ));
        }
        Ok(())
    }

    /// The comparison entries: the list file, if given, replaces the inline
    /// entries.
    pub fn resolve_comparisons(&self) -> Result<Vec<StructureEntry>> {
        let entries = match &self.comparison_list {
            Some(list_path) => parse_comparison_list(list_path)?,
            None => self.comparisons.clone(),
        };
        if entries.is_empty() {
            return Err(MedusaError::Config(
                "no comparison structures given — check 'comparison' or 'comparison_list'".into(),
            ));
        }
        for entry in &entries {
            if !entry.path.is_file() {
                return Err(MedusaError::Config(format!(
                    "comparison file not found: '{}'",
                    entry.path.display()
                )));
            }
        }
        Ok(entries)
    }

    /// Translate the alignment entries into engine descriptors.
    pub fn alignment_blocks(&self) -> Result<Vec<AlignmentBlock>> {
        self.alignments
            .iter()
            .map(|a| {
                Ok(AlignmentBlock {
                    length: a.length,
                    ref_chain: chain_char(&a.ref_chain)?,
                    ref_start: a.ref_start,
                    cmp_chain: chain_char(&a.cmp_chain)?,
                    cmp_start: a.cmp_start,
                })
            })
            .collect()
    }

    /// The declared secondary structure.
    pub fn secondary_structure(&self) -> SecondaryStructure {
        SecondaryStructure::new(
            self.helices
                .iter()
                .map(|h| Helix {
                    name: h.name.clone(),
                    i: h.i,
                    ni: h.ni,
                    j: h.j,
                    nj: h.nj,
                })
                .collect(),
            self.loops
                .iter()
                .map(|l| Loop {
                    name: l.name.clone(),
                    i: l.i,
                    n: l.n,
                })
                .collect(),
        )
    }

    /// Resolve every draw key against the secondary structure.
    pub fn squares(&self) -> Result<Vec<Square>> {
        let ss = self.secondary_structure();
        let mut squares = Vec::new();
        for key in &self.draw {
            squares.extend(parse_draw_key(&ss, key)?);
        }
        Ok(squares)
    }
}

/// A draw key is an element name (`"H1"`), an element pair (`"H1xL2"`), or
/// either form with a custom label (`"H1xL2: junction"`).
pub fn parse_draw_key(ss: &SecondaryStructure, key: &str) -> Result<Vec<Square>> {
    let (data, label) = match key.split_once(':') {
        Some((data, label)) => (data.trim(), Some(label.trim())),
        None => (key.trim(), None),
    };

    let unknown = || MedusaError::Config(format!("syntax error in draw key: '{key}' — check 'draw'"));

    if let Some((name1, name2)) = data.split_once('x') {
        let (name1, name2) = (name1.trim(), name2.trim());
        let e1 = ss.element(name1).ok_or_else(unknown)?;
        let e2 = ss.element(name2).ok_or_else(unknown)?;
        match (e1, e2) {
            (Element::Helix(_), Element::Helix(_)) => {
                ss.square_hh(name1, name2, label, SquareSide::Both)
            }
            (Element::Loop(_), Element::Loop(_)) => {
                ss.square_ll(name1, name2, label, SquareSide::Both)
            }
            (Element::Helix(_), Element::Loop(_)) => {
                ss.square_hl(name1, name2, label, SquareSide::Both)
            }
            (Element::Loop(_), Element::Helix(_)) => {
                ss.square_lh(name1, name2, label, SquareSide::Both)
            }
        }
    } else {
        match ss.element(data).ok_or_else(unknown)? {
            Element::Helix(_) => ss.square_helix(data, label, SquareSide::Both),
            Element::Loop(_) => ss.square_loop(data, label),
        }
    }
}

/// Parse a comparison-list file: one `path;model` per line, `#` comments and
/// blank lines skipped.
pub fn parse_comparison_list(path: impl AsRef<Path>) -> Result<Vec<StructureEntry>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| {
        MedusaError::Config(format!(
            "comparison list file not found: '{}': {e}",
            path.display()
        ))
    })?;

    let mut entries = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (file, model) = line.split_once(';').ok_or_else(|| {
            MedusaError::Config(format!("expecting 'file name;model number' in line: {line}"))
        })?;
        let model = model.trim().parse::<usize>().map_err(|_| {
            MedusaError::Config(format!("model number must be a number in line: {line}"))
        })?;
        entries.push(StructureEntry {
            path: PathBuf::from(file.trim()),
            model,
        });
    }
    Ok(entries)
}

fn chain_char(s: &str) -> Result<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(MedusaError::Config(format!(
            "chain id must be a single character, got '{s}'"
        ))),
    }
}
