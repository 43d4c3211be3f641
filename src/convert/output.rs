//! Output geometry and its target-profile element fragments
//!
//! Each [`OutputGeometry`] renders (via `Display`) to the single element the
//! Document Writer places in the symbol body: `<rect>`, `<circle>` or
//! `<path>`. Style classes follow the S-100 convention of one token per
//! paint, `s<stroke color>` and `f<fill color>`.

use std::fmt;

use glam::DVec2;

use super::curve::PathVertex;
use crate::style::{Fill, Paint, ResolvedStyle};
use crate::types::Angle;

/// Format a number with at most 3 decimals, trailing zeros trimmed.
pub(crate) fn fmt_num(value: f64) -> String {
    let s = format!("{:.3}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        _ => s.to_string(),
    }
}

fn fmt_point(p: DVec2) -> String {
    format!("{},{}", fmt_num(p.x), fmt_num(p.y))
}

/// The resolved shape in output space.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Axis-aligned rectangle from its top-left corner.
    Rect { origin: DVec2, size: DVec2 },
    /// Rotated rectangle as its four ordered corners.
    RotatedRect { corners: [DVec2; 4] },
    Circle { center: DVec2, radius: f64 },
    /// Ellipse as two half-arcs between the ends of its rotated major axis.
    Ellipse {
        start: DVec2,
        end: DVec2,
        radii: DVec2,
        rotation: Angle,
    },
    Line { from: DVec2, to: DVec2 },
    Path { vertices: Vec<PathVertex> },
    /// Closed outline; the last point repeats the first.
    Polygon { points: Vec<DVec2> },
}

/// Numeric style attached to an output element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputStyle {
    Resolved(ResolvedStyle),
    /// Fixed class and width used regardless of the source style.
    Placeholder {
        class: &'static str,
        stroke_width: f64,
    },
}

impl OutputStyle {
    pub fn stroke_width(&self) -> f64 {
        match self {
            OutputStyle::Resolved(style) => style.stroke_width,
            OutputStyle::Placeholder { stroke_width, .. } => *stroke_width,
        }
    }
}

/// One converted shape, ready for the Document Writer.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputGeometry {
    pub geometry: Geometry,
    pub style: OutputStyle,
}

impl OutputGeometry {
    pub fn new(geometry: Geometry, style: OutputStyle) -> Self {
        Self { geometry, style }
    }

    /// Name of the element this geometry renders to.
    pub fn element_name(&self) -> &'static str {
        match self.geometry {
            Geometry::Rect { .. } => "rect",
            Geometry::Circle { .. } => "circle",
            Geometry::RotatedRect { .. }
            | Geometry::Ellipse { .. }
            | Geometry::Line { .. }
            | Geometry::Path { .. }
            | Geometry::Polygon { .. } => "path",
        }
    }
}

fn write_path_data(f: &mut fmt::Formatter<'_>, geometry: &Geometry) -> fmt::Result {
    match geometry {
        Geometry::RotatedRect { corners } => {
            write!(f, "M {}", fmt_point(corners[0]))?;
            for p in &corners[1..] {
                write!(f, " L {}", fmt_point(*p))?;
            }
            write!(f, " L {}", fmt_point(corners[0]))
        }
        Geometry::Ellipse {
            start,
            end,
            radii,
            rotation,
        } => {
            // The major axis direction (cos, -sin) is a rotation by -θ.
            let arc = format!(
                "A {},{} {} 1 0",
                fmt_num(radii.x),
                fmt_num(radii.y),
                fmt_num(-rotation.degrees())
            );
            write!(
                f,
                "M {} {arc} {} {arc} {} Z",
                fmt_point(*start),
                fmt_point(*end),
                fmt_point(*start)
            )
        }
        Geometry::Line { from, to } => {
            write!(f, "M {} L {}", fmt_point(*from), fmt_point(*to))
        }
        Geometry::Path { vertices } => {
            let mut first = true;
            for vertex in vertices {
                if !first {
                    f.write_str(" ")?;
                }
                first = false;
                match vertex {
                    PathVertex::MoveTo(p) => write!(f, "M {}", fmt_point(*p))?,
                    PathVertex::LineTo(p) => write!(f, "L {}", fmt_point(*p))?,
                    PathVertex::Close => f.write_str("Z")?,
                }
            }
            Ok(())
        }
        Geometry::Polygon { points } => {
            for (i, p) in points.iter().enumerate() {
                let cmd = if i == 0 { "M" } else { " L" };
                write!(f, "{cmd} {}", fmt_point(*p))?;
            }
            Ok(())
        }
        Geometry::Rect { .. } | Geometry::Circle { .. } => Ok(()),
    }
}

fn write_paint(f: &mut fmt::Formatter<'_>, paint: &Paint) -> fmt::Result {
    let mut tokens = Vec::new();
    if let Some(stroke) = paint.stroke {
        tokens.push(format!("s{stroke}"));
    }
    match paint.fill {
        Fill::None => f.write_str(" fill=\"none\"")?,
        Fill::Color(color) => tokens.push(format!("f{color}")),
    }
    if !tokens.is_empty() {
        write!(f, " class=\"{}\"", tokens.join(" "))?;
    }
    Ok(())
}

impl fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputStyle::Resolved(style) => {
                if let Some(paint) = &style.paint {
                    write_paint(f, paint)?;
                }
                if !style.opacity.is_opaque() {
                    write!(f, " opacity=\"{}\"", fmt_num(style.opacity.raw()))?;
                }
            }
            OutputStyle::Placeholder { class, .. } => write!(f, " class=\"{class}\"")?,
        }
        write!(f, " style=\"stroke-width:{};\"", fmt_num(self.stroke_width()))
    }
}

impl fmt::Display for OutputGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.geometry {
            Geometry::Rect { origin, size } => write!(
                f,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                fmt_num(origin.x),
                fmt_num(origin.y),
                fmt_num(size.x),
                fmt_num(size.y)
            )?,
            Geometry::Circle { center, radius } => write!(
                f,
                "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"",
                fmt_num(center.x),
                fmt_num(center.y),
                fmt_num(*radius)
            )?,
            path => {
                f.write_str("<path d=\"")?;
                write_path_data(f, path)?;
                f.write_str("\"")?;
            }
        }
        write!(f, "{}/>", self.style)
    }
}
