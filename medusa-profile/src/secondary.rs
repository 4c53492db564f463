//! Secondary-structure elements and their profile squares.
//!
//! Helices and loops are declared in correspondence-index space. Each draw
//! request derives one or more [`Square`]s (rectangular matrix regions)
//! from a single element or an element pair, normalized to a canonical
//! orientation and validated against self-crossing strand pairings.

use medusa_core::{MedusaError, Result};

/// Outline color for single-element squares.
const COLOR_SINGLE: &str = "#ff00ff";
/// Outline color for element-pair squares.
const COLOR_PAIR: &str = "#0000ff";

/// A helix: two paired strands `[i, i+ni-1]` and `[j, j+nj-1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Helix {
    pub name: String,
    pub i: usize,
    pub ni: usize,
    pub j: usize,
    pub nj: usize,
}

/// A loop: one strand `[i, i+n-1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Loop {
    pub name: String,
    pub i: usize,
    pub n: usize,
}

/// A declared secondary-structure element.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    Helix(Helix),
    Loop(Loop),
}

impl Element {
    /// The element's declared name.
    pub fn name(&self) -> &str {
        match self {
            Element::Helix(h) => &h.name,
            Element::Loop(l) => &l.name,
        }
    }
}

/// Which diagonal half of a pairing to derive squares for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SquareSide {
    Upper,
    Lower,
    #[default]
    Both,
}

impl SquareSide {
    fn wants_upper(self) -> bool {
        matches!(self, SquareSide::Upper | SquareSide::Both)
    }

    fn wants_lower(self) -> bool {
        matches!(self, SquareSide::Lower | SquareSide::Both)
    }
}

/// A rectangular profile-matrix region: columns `a..=c`, rows `b..=d`.
///
/// Invariant: `a <= c` and `b <= d`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Square {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub d: usize,
    pub label: String,
    pub color: String,
}

impl Square {
    /// Columns covered.
    pub fn width(&self) -> usize {
        self.c - self.a + 1
    }

    /// Rows covered.
    pub fn height(&self) -> usize {
        self.d - self.b + 1
    }

    /// Number of matrix cells covered.
    pub fn cells(&self) -> usize {
        self.width() * self.height()
    }
}

/// Normalize a quadruple to the upper-diagonal orientation.
///
/// When `a > b` both coordinate pairs are swapped together, so the result is
/// independent of the order the strands were given in.
pub fn get_upper(a: usize, b: usize, c: usize, d: usize) -> (usize, usize, usize, usize) {
    if a > b {
        (b, a, d, c)
    } else {
        (a, b, c, d)
    }
}

/// Normalize a quadruple to the lower-diagonal orientation.
pub fn get_lower(a: usize, b: usize, c: usize, d: usize) -> (usize, usize, usize, usize) {
    if a < b {
        (b, a, d, c)
    } else {
        (a, b, c, d)
    }
}

/// Validate a normalized quadruple.
///
/// For two-strand squares the crossing parity `(a>b) ^ (c>d) ^ (a>d) ^ (c>b)`
/// must be false: the strand intervals either nest on the same side of the
/// diagonal or don't overlap at all; anything else is a self-crossing
/// pairing. Unconditionally the rectangle must not be inverted (`a<=c`,
/// `b<=d`).
pub fn check_coords(
    (a, b, c, d): (usize, usize, usize, usize),
    context: &str,
    single_strand: bool,
) -> Result<()> {
    if !single_strand && ((a > b) ^ (c > d) ^ (a > d) ^ (c > b)) {
        return Err(MedusaError::Config(format!(
            "bad cross over in {context} ({a}, {b}) - ({c}, {d})"
        )));
    }

    if a > c || b > d {
        return Err(MedusaError::Config(format!(
            "inverted square in {context} ({a}, {b}) - ({c}, {d})"
        )));
    }

    Ok(())
}

/// The declared secondary structure of a correspondence: named helices and
/// loops, queried by the square generators.
#[derive(Debug, Clone, Default)]
pub struct SecondaryStructure {
    helices: Vec<Helix>,
    loops: Vec<Loop>,
}

impl SecondaryStructure {
    pub fn new(helices: Vec<Helix>, loops: Vec<Loop>) -> Self {
        Self { helices, loops }
    }

    /// Look up an element by name, helices first.
    pub fn element(&self, name: &str) -> Option<Element> {
        if let Some(h) = self.helices.iter().find(|h| h.name == name) {
            return Some(Element::Helix(h.clone()));
        }
        self.loops
            .iter()
            .find(|l| l.name == name)
            .map(|l| Element::Loop(l.clone()))
    }

    fn helix(&self, name: &str) -> Result<&Helix> {
        let h = self
            .helices
            .iter()
            .find(|h| h.name == name)
            .ok_or_else(|| MedusaError::Config(format!("unknown helix '{name}'")))?;
        if h.ni == 0 || h.nj == 0 {
            return Err(MedusaError::Config(format!(
                "helix '{name}' has a zero-length strand"
            )));
        }
        Ok(h)
    }

    fn strand(&self, name: &str) -> Result<&Loop> {
        let l = self
            .loops
            .iter()
            .find(|l| l.name == name)
            .ok_or_else(|| MedusaError::Config(format!("unknown loop '{name}'")))?;
        if l.n == 0 {
            return Err(MedusaError::Config(format!("loop '{name}' has zero length")));
        }
        Ok(l)
    }

    /// The square of a loop against itself (always on the diagonal).
    pub fn square_loop(&self, name: &str, label: Option<&str>) -> Result<Vec<Square>> {
        let l = self.strand(name)?;
        let label = effective_label(label, name);

        let coords = get_upper(l.i, l.i, l.i + l.n - 1, l.i + l.n - 1);
        check_coords(coords, &format!("loop {name}"), true)?;

        Ok(vec![square_at(coords, &label, COLOR_SINGLE)])
    }

    /// The square(s) of a helix's own strand pairing.
    pub fn square_helix(&self, name: &str, label: Option<&str>, side: SquareSide) -> Result<Vec<Square>> {
        let h = self.helix(name)?;
        let label = effective_label(label, name);

        let quad = (h.i, h.j, h.i + h.ni - 1, h.j + h.nj - 1);
        let mut squares = Vec::new();
        if side.wants_upper() {
            squares.push((get_upper(quad.0, quad.1, quad.2, quad.3), label.clone()));
        }
        if side.wants_lower() {
            squares.push((get_lower(quad.0, quad.1, quad.2, quad.3), label.clone()));
        }

        let context = format!("helix {name}");
        squares
            .into_iter()
            .map(|(coords, label)| {
                check_coords(coords, &context, false)?;
                Ok(square_at(coords, &label, COLOR_SINGLE))
            })
            .collect()
    }

    /// Squares for every strand combination of two helices.
    pub fn square_hh(
        &self,
        name1: &str,
        name2: &str,
        label: Option<&str>,
        side: SquareSide,
    ) -> Result<Vec<Square>> {
        let h1 = self.helix(name1)?;
        let h2 = self.helix(name2)?;
        let label = effective_pair_label(label, name1, name2);

        let combos = [
            (h1.i, h2.i, h1.i + h1.ni - 1, h2.i + h2.ni - 1),
            (h1.i, h2.j, h1.i + h1.ni - 1, h2.j + h2.nj - 1),
            (h1.j, h2.i, h1.j + h1.nj - 1, h2.i + h2.ni - 1),
            (h1.j, h2.j, h1.j + h1.nj - 1, h2.j + h2.nj - 1),
        ];

        let context = format!("comparing helices {name1} and {name2}");
        self.pair_squares(&combos, &label, &context, side)
    }

    /// The square(s) of two loops against each other.
    pub fn square_ll(
        &self,
        name1: &str,
        name2: &str,
        label: Option<&str>,
        side: SquareSide,
    ) -> Result<Vec<Square>> {
        let l1 = self.strand(name1)?;
        let l2 = self.strand(name2)?;
        let label = effective_pair_label(label, name1, name2);

        let combos = [(l1.i, l2.i, l1.i + l1.n - 1, l2.i + l2.n - 1)];
        let context = format!("comparing loops {name1} and {name2}");
        self.pair_squares(&combos, &label, &context, side)
    }

    /// Squares of a helix against a loop (one combo per helix strand).
    pub fn square_hl(
        &self,
        helix_name: &str,
        loop_name: &str,
        label: Option<&str>,
        side: SquareSide,
    ) -> Result<Vec<Square>> {
        let h = self.helix(helix_name)?;
        let l = self.strand(loop_name)?;
        let label = effective_pair_label(label, helix_name, loop_name);

        let combos = [
            (l.i, h.i, l.i + l.n - 1, h.i + h.ni - 1),
            (l.i, h.j, l.i + l.n - 1, h.j + h.nj - 1),
        ];
        let context = format!("comparing helix {helix_name} and loop {loop_name}");
        self.pair_squares(&combos, &label, &context, side)
    }

    /// Loop-against-helix is helix-against-loop with the names swapped.
    pub fn square_lh(
        &self,
        loop_name: &str,
        helix_name: &str,
        label: Option<&str>,
        side: SquareSide,
    ) -> Result<Vec<Square>> {
        let label = effective_pair_label(label, loop_name, helix_name);
        self.square_hl(helix_name, loop_name, Some(&label), side)
    }

    fn pair_squares(
        &self,
        combos: &[(usize, usize, usize, usize)],
        label: &str,
        context: &str,
        side: SquareSide,
    ) -> Result<Vec<Square>> {
        let mut out = Vec::new();
        for &(a, b, c, d) in combos {
            if side.wants_upper() {
                let coords = get_upper(a, b, c, d);
                check_coords(coords, context, false)?;
                out.push(square_at(coords, label, COLOR_PAIR));
            }
            if side.wants_lower() {
                let coords = get_lower(a, b, c, d);
                check_coords(coords, context, false)?;
                out.push(square_at(coords, label, COLOR_PAIR));
            }
        }
        Ok(out)
    }
}

fn square_at((a, b, c, d): (usize, usize, usize, usize), label: &str, color: &str) -> Square {
    Square {
        a,
        b,
        c,
        d,
        label: label.to_string(),
        color: color.to_string(),
    }
}

fn effective_label(label: Option<&str>, name: &str) -> String {
    match label {
        Some(l) if !l.is_empty() => l.to_string(),
        _ => name.to_string(),
    }
}

fn effective_pair_label(label: Option<&str>, name1: &str, name2: &str) -> String {
    match label {
        Some(l) if !l.is_empty() => l.to_string(),
        _ => format!("{name1} x {name2}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helix(name: &str, i: usize, ni: usize, j: usize, nj: usize) -> Helix {
        Helix {
            name: name.into(),
            i,
            ni,
            j,
            nj,
        }
    }

    fn looop(name: &str, i: usize, n: usize) -> Loop {
        Loop {
            name: name.into(),
            i,
            n,
        }
    }

    fn ss() -> SecondaryStructure {
        SecondaryStructure::new(
            vec![helix("H1", 0, 4, 20, 4), helix("H2", 6, 3, 14, 3)],
            vec![looop("L1", 4, 2), looop("L2", 9, 5)],
        )
    }

    #[test]
    fn upper_normalization_is_orientation_invariant() {
        for &(a, b, c, d) in &[(0usize, 5usize, 3usize, 9usize), (5, 0, 9, 3), (2, 2, 4, 4)] {
            assert_eq!(get_upper(a, b, c, d), get_upper(b, a, d, c));
        }
    }

    #[test]
    fn upper_and_lower_mirror_each_other() {
        assert_eq!(get_upper(5, 0, 9, 3), (0, 5, 3, 9));
        assert_eq!(get_lower(0, 5, 3, 9), (5, 0, 9, 3));
        // Already oriented input passes through
        assert_eq!(get_upper(0, 5, 3, 9), (0, 5, 3, 9));
        assert_eq!(get_lower(5, 0, 9, 3), (5, 0, 9, 3));
    }

    #[test]
    fn helix_yields_upper_and_lower_squares() {
        let squares = ss().square_helix("H1", None, SquareSide::Both).unwrap();
        assert_eq!(squares.len(), 2);
        // upper: (0, 20) - (3, 23); lower mirrors it
        assert_eq!((squares[0].a, squares[0].b, squares[0].c, squares[0].d), (0, 20, 3, 23));
        assert_eq!((squares[1].a, squares[1].b, squares[1].c, squares[1].d), (20, 0, 23, 3));
        assert_eq!(squares[0].label, "H1");
        assert_eq!(squares[0].color, "#ff00ff");
    }

    #[test]
    fn helix_side_selection() {
        assert_eq!(ss().square_helix("H1", None, SquareSide::Upper).unwrap().len(), 1);
        assert_eq!(ss().square_helix("H1", None, SquareSide::Lower).unwrap().len(), 1);
    }

    #[test]
    fn loop_square_sits_on_the_diagonal() {
        let squares = ss().square_loop("L1", None).unwrap();
        assert_eq!(squares.len(), 1);
        let s = &squares[0];
        assert_eq!((s.a, s.b, s.c, s.d), (4, 4, 5, 5));
        assert_eq!(s.cells(), 4);
    }

    #[test]
    fn helix_pair_yields_eight_squares() {
        let squares = ss().square_hh("H1", "H2", None, SquareSide::Both).unwrap();
        assert_eq!(squares.len(), 8);
        assert!(squares.iter().all(|s| s.label == "H1 x H2"));
        assert!(squares.iter().all(|s| s.color == "#0000ff"));
        assert!(squares.iter().all(|s| s.a <= s.c && s.b <= s.d));
    }

    #[test]
    fn custom_label_overrides_default() {
        let squares = ss().square_ll("L1", "L2", Some("apex"), SquareSide::Both).unwrap();
        assert!(squares.iter().all(|s| s.label == "apex"));
    }

    #[test]
    fn lh_is_hl_with_swapped_names() {
        let hl = ss().square_hl("H2", "L1", None, SquareSide::Both).unwrap();
        let lh = ss().square_lh("L1", "H2", None, SquareSide::Both).unwrap();
        let coords = |sq: &[Square]| -> Vec<(usize, usize, usize, usize)> {
            sq.iter().map(|s| (s.a, s.b, s.c, s.d)).collect()
        };
        assert_eq!(coords(&hl), coords(&lh));
        assert_eq!(lh[0].label, "L1 x H2");
    }

    #[test]
    fn unknown_element_is_config_error() {
        let err = ss().square_helix("H9", None, SquareSide::Both).unwrap_err();
        assert!(matches!(err, MedusaError::Config(_)));
    }

    #[test]
    fn check_coords_accepts_and_rejects_per_rule() {
        // Nested on one side of the diagonal: passes both rules.
        assert!(check_coords((0, 5, 3, 9), "ok", false).is_ok());
        // Interleaved intervals: crossing parity fires.
        let err = check_coords((0, 5, 9, 14), "crossed", false).unwrap_err();
        assert!(err.to_string().contains("cross over"));
        // Parity-clean but a > c: inverted rectangle fires.
        let err = check_coords((2, 3, 1, 9), "flipped", false).unwrap_err();
        assert!(err.to_string().contains("inverted square"));
        // Single-strand squares skip the parity rule entirely.
        assert!(check_coords((4, 4, 5, 5), "loop", true).is_ok());
    }

    #[test]
    fn zero_length_elements_are_config_errors() {
        let ss = SecondaryStructure::new(
            vec![helix("H0", 3, 0, 9, 2)],
            vec![looop("L0", 1, 0)],
        );
        assert!(ss.square_helix("H0", None, SquareSide::Both).is_err());
        assert!(ss.square_loop("L0", None).is_err());
    }

    #[test]
    fn crossing_strands_are_rejected() {
        // Strand intervals [0,9] and [5,14] interleave across the diagonal:
        // parity (a>b, c>d, a>d, c>b) = (F, F, F, T) → crossing.
        let ss = SecondaryStructure::new(vec![helix("HX", 0, 10, 5, 10)], vec![]);
        let err = ss.square_helix("HX", None, SquareSide::Upper).unwrap_err();
        assert!(err.to_string().contains("cross over"));
        assert!(err.to_string().contains("HX"));
    }

    #[test]
    fn nested_strands_pass_validation() {
        // [0,3] vs [20,23], cleanly separated: parity false.
        let squares = ss().square_helix("H1", None, SquareSide::Both).unwrap();
        assert!(!squares.is_empty());
    }
}
