//! Minimal SVG scene builder.
//!
//! Holds primitives in numbered layers and serializes them into one
//! self-contained document; higher layers are emitted later and therefore
//! paint on top. Just enough SVG for the profile renderer: lines,
//! rectangles, text.

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// A drawable primitive.
#[derive(Debug, Clone)]
pub enum Shape {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: String,
        stroke_width: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: String,
        stroke: String,
        stroke_width: f64,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        size: u32,
        color: String,
    },
}

impl Shape {
    /// A black line of width 1.
    pub fn line((x1, y1): (f64, f64), (x2, y2): (f64, f64)) -> Self {
        Shape::Line {
            x1,
            y1,
            x2,
            y2,
            stroke: "#000000".into(),
            stroke_width: 1.0,
        }
    }

    /// A colored line of the given width.
    pub fn colored_line(
        (x1, y1): (f64, f64),
        (x2, y2): (f64, f64),
        stroke: &str,
        stroke_width: f64,
    ) -> Self {
        Shape::Line {
            x1,
            y1,
            x2,
            y2,
            stroke: stroke.into(),
            stroke_width,
        }
    }

    /// A filled rectangle with a black outline.
    pub fn filled_rect((x, y): (f64, f64), width: f64, height: f64, fill: &str) -> Self {
        Shape::Rect {
            x,
            y,
            width,
            height,
            fill: fill.into(),
            stroke: "#000000".into(),
            stroke_width: 1.0,
        }
    }

    /// A borderless solid cell (fill and stroke share the color).
    pub fn solid_cell((x, y): (f64, f64), width: f64, height: f64, color: &str) -> Self {
        Shape::Rect {
            x,
            y,
            width,
            height,
            fill: color.into(),
            stroke: color.into(),
            stroke_width: 0.0,
        }
    }

    /// An unfilled outline rectangle.
    pub fn outline_rect(
        (x, y): (f64, f64),
        width: f64,
        height: f64,
        stroke: &str,
        stroke_width: f64,
    ) -> Self {
        Shape::Rect {
            x,
            y,
            width,
            height,
            fill: "none".into(),
            stroke: stroke.into(),
            stroke_width,
        }
    }

    /// Black text at the default label size.
    pub fn text((x, y): (f64, f64), content: impl Into<String>) -> Self {
        Shape::sized_text((x, y), content, 10)
    }

    /// Black text at an explicit font size.
    pub fn sized_text((x, y): (f64, f64), content: impl Into<String>, size: u32) -> Self {
        Shape::Text {
            x,
            y,
            content: content.into(),
            size,
            color: "#000000".into(),
        }
    }
}

/// An SVG document under construction.
#[derive(Debug, Clone)]
pub struct Scene {
    width: f64,
    height: f64,
    layers: BTreeMap<i32, Vec<Shape>>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            layers: BTreeMap::new(),
        }
    }

    /// Add a shape to the base layer.
    pub fn add(&mut self, shape: Shape) {
        self.add_layered(shape, 0);
    }

    /// Add a shape to a specific layer; higher layers draw on top.
    pub fn add_layered(&mut self, shape: Shape, layer: i32) {
        self.layers.entry(layer).or_default().push(shape);
    }

    /// Serialize to a complete SVG document.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\">",
            fmt_num(self.width),
            fmt_num(self.height)
        );
        let _ = writeln!(
            out,
            "<g style=\"fill-opacity:1.0; stroke:black; stroke-width:1;\">"
        );

        for shapes in self.layers.values() {
            for shape in shapes {
                match shape {
                    Shape::Line {
                        x1,
                        y1,
                        x2,
                        y2,
                        stroke,
                        stroke_width,
                    } => {
                        let _ = writeln!(
                            out,
                            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
                            fmt_num(*x1),
                            fmt_num(*y1),
                            fmt_num(*x2),
                            fmt_num(*y2),
                            stroke,
                            fmt_num(*stroke_width)
                        );
                    }
                    Shape::Rect {
                        x,
                        y,
                        width,
                        height,
                        fill,
                        stroke,
                        stroke_width,
                    } => {
                        let _ = writeln!(
                            out,
                            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
                            fmt_num(*x),
                            fmt_num(*y),
                            fmt_num(*width),
                            fmt_num(*height),
                            fill,
                            stroke,
                            fmt_num(*stroke_width)
                        );
                    }
                    Shape::Text {
                        x,
                        y,
                        content,
                        size,
                        color,
                    } => {
                        let _ = writeln!(
                            out,
                            "<text x=\"{}\" y=\"{}\" font-size=\"{}\" font-weight=\"normal\" font-family=\"Verdana\" stroke=\"{}\">{}</text>",
                            fmt_num(*x),
                            fmt_num(*y),
                            size,
                            color,
                            escape_text(content)
                        );
                    }
                }
            }
        }

        out.push_str("</g>\n</svg>\n");
        out
    }
}

/// Render a coordinate without a trailing `.0` for whole numbers.
fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
