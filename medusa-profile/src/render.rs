//! SVG rendering of a computed profile.
//!
//! One document, four panels sharing a translatable origin each: the color
//! legend at the bottom, the three summary curves above it, the N×N matrix
//! grid at the top, and the square overlays drawn on a higher layer so they
//! stay visible over the grid. Logical "up" maps to screen "up" by negating
//! y offsets against each panel origin.

use medusa_core::Result;

use crate::engine::Profile;
use crate::matching::Correspondence;
use crate::palette::Palette;
use crate::svg::{Scene, Shape};

/// Renderer tunables, fixed at construction.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderOptions {
    /// Side length of one matrix cell in pixels.
    pub square_side: f64,
    /// Bands in the white→yellow ramp.
    pub steps_down: usize,
    /// Bands in the yellow→red ramp.
    pub steps_up: usize,
    /// Scalar where the lower ramp ends.
    pub limit_down: f64,
    /// Scalar where the upper ramp saturates.
    pub limit_up: f64,
    pub color_row_mean: String,
    pub color_col_mean: String,
    pub color_local_rmsd: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            square_side: 16.0,
            steps_down: 10,
            steps_up: 10,
            limit_down: 30.0,
            limit_up: 60.0,
            color_row_mean: "#00FF00".into(),
            color_col_mean: "#0000FF".into(),
            color_local_rmsd: "#FF0000".into(),
        }
    }
}

impl RenderOptions {
    /// Defaults matched to the engine's normalization mode: normalized cells
    /// live in a much smaller range than raw Angstrom distances.
    pub fn for_normalization(normalize: bool) -> Self {
        if normalize {
            Self {
                limit_down: 1.5,
                limit_up: 3.0,
                ..Self::default()
            }
        } else {
            Self::default()
        }
    }

    fn palette(&self) -> Result<Palette> {
        Palette::build(self.limit_down, self.steps_down, self.limit_up, self.steps_up)
    }
}

/// A panel origin; y offsets are negated so larger offsets draw higher up.
#[derive(Debug, Clone, Copy)]
struct Origin {
    x: f64,
    y: f64,
}

impl Origin {
    fn at(&self, dx: f64, dy: f64) -> (f64, f64) {
        (self.x + dx, self.y - dy)
    }
}

/// Layer for the square overlays (above the grid and curves).
const LAYER_OVERLAY: i32 = 5;
/// Layer for the curve axis labels (topmost).
const LAYER_AXIS_LABELS: i32 = 10;

/// Draws a [`Profile`] into a single SVG document.
#[derive(Debug)]
pub struct SvgRenderer<'a> {
    profile: &'a Profile,
    correspondence: &'a Correspondence,
    options: RenderOptions,
}

impl<'a> SvgRenderer<'a> {
    pub fn new(
        profile: &'a Profile,
        correspondence: &'a Correspondence,
        options: RenderOptions,
    ) -> Self {
        Self {
            profile,
            correspondence,
            options,
        }
    }

    /// Render the full document.
    pub fn render(&self) -> Result<String> {
        let n = self.profile.matrix.size;
        let s = self.options.square_side;
        let palette = self.options.palette()?;

        // Sized to content: wide enough for the matrix panel or the legend,
        // whichever needs more.
        let width = ((2 + n) as f64 * s).max((2 + palette.band_count()) as f64 * s);
        let height = (17 + n) as f64 * s;
        let mut scene = Scene::new(width, height);

        let scale_origin = Origin {
            x: s,
            y: (17 + n) as f64 * s,
        };
        let curve_origin = Origin {
            x: s,
            y: (13 + n) as f64 * s,
        };
        let matrix_origin = Origin {
            x: s,
            y: (1 + n) as f64 * s,
        };

        self.draw_scale(&mut scene, &palette, scale_origin);
        self.draw_curves(&mut scene, curve_origin);
        self.draw_matrix(&mut scene, &palette, matrix_origin);
        self.draw_squares(&mut scene, matrix_origin);

        Ok(scene.to_xml())
    }

    /// The color legend: one cell per band plus the three limit labels.
    fn draw_scale(&self, scene: &mut Scene, palette: &Palette, origin: Origin) {
        let s = self.options.square_side;

        for (i, color) in palette.colors().iter().enumerate() {
            scene.add(Shape::filled_rect(
                origin.at(i as f64 * s, 2.0 * s),
                s,
                s,
                color,
            ));
        }

        scene.add(Shape::text(origin.at(0.0, 0.0), "0.0"));
        scene.add(Shape::text(
            origin.at(palette.steps_down() as f64 * s, 0.0),
            format!("{:.2}", palette.limit_down()),
        ));
        scene.add(Shape::text(
            origin.at((palette.band_count() - 1) as f64 * s, 0.0),
            format!("{:.2}", palette.limit_up()),
        ));
    }

    /// Row-mean, column-mean, and local-RMSD curves on one auto-scaled axis.
    fn draw_curves(&self, scene: &mut Scene, origin: Origin) {
        let n = self.profile.matrix.size;
        if n == 0 {
            return;
        }
        let s = self.options.square_side;

        let curve_max = [
            &self.profile.row_mean,
            &self.profile.col_mean,
            &self.profile.local_rmsd,
        ]
        .iter()
        .flat_map(|c| c.iter().copied())
        .fold(0.0, f64::max);

        // Per-cell increment: a tenth of the overall maximum, rounded up to
        // the next multiple of 5.
        let y_inc = (((curve_max / 10.0) as i64 / 5 + 1) * 5) as f64;

        let start = origin.at(0.0, 0.0);
        scene.add(Shape::line(start, origin.at(n as f64 * s, 0.0)));
        scene.add(Shape::line(start, origin.at(0.0, 10.0 * s)));

        for i in 0..=5u32 {
            scene.add_layered(
                Shape::text(
                    origin.at(-s, i as f64 * 2.0 * s),
                    format!("{:2}", (y_inc * 2.0 * i as f64).round() as i64),
                ),
                LAYER_AXIS_LABELS,
            );
        }

        for (r, pair) in self.correspondence.pairs().iter().enumerate() {
            scene.add(Shape::text(
                origin.at(r as f64 * s, -s),
                pair.comparison.name.clone(),
            ));
        }

        self.draw_curve(scene, origin, &self.profile.row_mean, y_inc, &self.options.color_row_mean);
        self.draw_curve(scene, origin, &self.profile.col_mean, y_inc, &self.options.color_col_mean);
        self.draw_curve(
            scene,
            origin,
            &self.profile.local_rmsd,
            y_inc,
            &self.options.color_local_rmsd,
        );
    }

    fn draw_curve(&self, scene: &mut Scene, origin: Origin, values: &[f64], y_inc: f64, color: &str) {
        let s = self.options.square_side;
        let mut prev = origin.at(s / 2.0, values[0] / y_inc * s);
        for (i, &v) in values.iter().enumerate().skip(1) {
            let next = origin.at(i as f64 * s + s / 2.0, v / y_inc * s);
            scene.add(Shape::colored_line(prev, next, color, 1.0));
            prev = next;
        }
    }

    /// The N×N color grid with residue-name labels on both edges.
    fn draw_matrix(&self, scene: &mut Scene, palette: &Palette, origin: Origin) {
        let n = self.profile.matrix.size;
        let s = self.options.square_side;

        for (r, pair) in self.correspondence.pairs().iter().enumerate() {
            scene.add(Shape::text(
                origin.at(-s, r as f64 * s),
                pair.reference.name.clone(),
            ));
            scene.add(Shape::text(
                origin.at(r as f64 * s, -s),
                pair.comparison.name.clone(),
            ));

            for c in 0..n {
                let color = palette.color_for(self.profile.matrix.get(r, c));
                scene.add(Shape::solid_cell(
                    origin.at(c as f64 * s, (r + 1) as f64 * s),
                    s,
                    s,
                    color,
                ));
            }
        }
    }

    /// Square outlines with their label and average, above everything else.
    fn draw_squares(&self, scene: &mut Scene, origin: Origin) {
        let s = self.options.square_side;

        for sv in &self.profile.squares {
            let sq = &sv.square;
            let (a, b, d) = (sq.a as f64, sq.b as f64, sq.d as f64);

            scene.add_layered(
                Shape::outline_rect(
                    origin.at(a * s + 1.0, (d + 1.0) * s - 1.0),
                    sq.width() as f64 * s - 2.0,
                    sq.height() as f64 * s - 2.0,
                    &sq.color,
                    2.0,
                ),
                LAYER_OVERLAY,
            );
            scene.add_layered(
                Shape::sized_text(origin.at(a * s + 2.0, d * s), sq.label.clone(), 8),
                LAYER_OVERLAY,
            );
            scene.add_layered(
                Shape::sized_text(
                    origin.at(a * s + 2.0, b * s + 3.0),
                    format!("{:.2}", sv.average),
                    8,
                ),
                LAYER_OVERLAY,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ProfileEngine, ProfileOptions};
    use crate::matching::{AlignmentBlock, SourceRef};
    use crate::secondary::Square;
    use medusa_struct::types::{Atom, Chain, Model, Point3D, Residue};

    fn make_atom(name: &str, x: f64, y: f64, z: f64) -> Atom {
        Atom {
            serial: 1,
            name: name.into(),
            coords: Point3D::new(x, y, z),
            occupancy: 1.0,
            temp_factor: 0.0,
            element: None,
            is_hetatm: false,
        }
    }

    fn residue(name: &str, seq_num: i32, origin: f64) -> Residue {
        Residue {
            name: name.into(),
            seq_num,
            i_code: None,
            atoms: vec![
                make_atom("P", origin, 0.0, 0.0),
                make_atom("C1'", origin + 1.0, 0.0, 0.0),
                make_atom("N1", origin, 1.0, 0.0),
            ],
        }
    }

    fn fixture() -> (Correspondence, Profile) {
        let model = Model {
            serial: 0,
            chains: vec![Chain::new(
                'A',
                vec![residue("G", 1, 0.0), residue("C", 2, 8.0)],
            )],
        };
        let blocks = [AlignmentBlock {
            length: 2,
            ref_chain: 'A',
            ref_start: 1,
            cmp_chain: 'A',
            cmp_start: 1,
        }];
        let corr = Correspondence::from_blocks(
            &model,
            &model,
            &blocks,
            SourceRef::new("ref.pdb", 0),
            SourceRef::new("cmp.pdb", 0),
        )
        .unwrap();
        let squares = vec![Square {
            a: 0,
            b: 0,
            c: 1,
            d: 1,
            label: "H1".into(),
            color: "#ff00ff".into(),
        }];
        let profile = ProfileEngine::new(&corr, squares, ProfileOptions::default())
            .compute()
            .unwrap();
        (corr, profile)
    }

    #[test]
    fn renders_all_four_panels() {
        let (corr, profile) = fixture();
        let svg = SvgRenderer::new(&profile, &corr, RenderOptions::default())
            .render()
            .unwrap();

        // Legend: 20 band cells and the three scale labels.
        assert!(svg.contains(">0.0<"));
        assert!(svg.contains(">30.00<"));
        assert!(svg.contains(">60.00<"));
        // Matrix cells: 4 zero-valued cells rendered white.
        assert_eq!(svg.matches("fill=\"#ffffff\" stroke=\"#ffffff\"").count(), 4);
        // Curves in their configured colors.
        assert!(svg.contains("stroke=\"#00FF00\""));
        assert!(svg.contains("stroke=\"#0000FF\""));
        assert!(svg.contains("stroke=\"#FF0000\""));
        // Square overlay with label and average.
        assert!(svg.contains(">H1<"));
        assert!(svg.contains(">0.00<"));
        assert!(svg.contains("stroke=\"#ff00ff\""));
        // Residue labels appear on both axes.
        assert!(svg.matches(">G<").count() >= 2);
    }

    #[test]
    fn overlay_is_emitted_after_the_grid() {
        let (corr, profile) = fixture();
        let svg = SvgRenderer::new(&profile, &corr, RenderOptions::default())
            .render()
            .unwrap();
        let grid_pos = svg.find("fill=\"#ffffff\"").unwrap();
        let overlay_pos = svg.find("stroke=\"#ff00ff\"").unwrap();
        assert!(grid_pos < overlay_pos);
    }

    #[test]
    fn canvas_is_sized_to_content() {
        let (corr, profile) = fixture();
        let svg = SvgRenderer::new(&profile, &corr, RenderOptions::default())
            .render()
            .unwrap();
        // N=2 with 20 legend bands: width is driven by the legend, height by
        // the panel stack: (17 + 2) * 16 = 304.
        assert!(svg.contains("width=\"352\""));
        assert!(svg.contains("height=\"304\""));
    }

    #[test]
    fn normalized_options_use_tighter_limits() {
        let opts = RenderOptions::for_normalization(true);
        assert!((opts.limit_down - 1.5).abs() < 1e-12);
        assert!((opts.limit_up - 3.0).abs() < 1e-12);
        let (corr, profile) = fixture();
        let svg = SvgRenderer::new(&profile, &corr, opts).render().unwrap();
        assert!(svg.contains(">1.50<"));
        assert!(svg.contains(">3.00<"));
    }
}
