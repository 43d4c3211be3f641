//! Shape records and the Shape Transformer
//!
//! Each record is one parsed source shape. [`ToGeometry`] maps a record plus
//! its resolved style class into a single [`OutputGeometry`]; dispatch over
//! the closed [`ShapeRecord`] variant is generated by `enum_dispatch`.

use enum_dispatch::enum_dispatch;
use glam::{DVec2, dvec2};

use super::affine::{decompose_angle, ellipse_axis_endpoints, rotated_rectangle_corners};
use super::coords::CoordinateTransformer;
use super::curve::{PathCommand, approximate_path};
use super::defaults::{
    PATH_PLACEHOLDER_CLASS, PATH_PLACEHOLDER_STROKE_WIDTH, POLYGON_PLACEHOLDER_CLASS,
    POLYGON_PLACEHOLDER_STROKE_WIDTH,
};
use super::output::{Geometry, OutputGeometry, OutputStyle};
use crate::element::{Attributes, ShapeKind};
use crate::errors::{ConvertError, CurveFitFailure};
use crate::parse;
use crate::style::{ResolvedStyle, StyleClass, class_reference};
use crate::types::Angle;

/// Common behavior for all shape records
#[enum_dispatch]
pub trait ToGeometry {
    /// Which source tag the record came from.
    fn kind(&self) -> ShapeKind;

    /// The style class the shape names, if any.
    fn class(&self) -> Option<&str>;

    /// Convert into output space with the resolved class (`None` when the
    /// shape has no class or the class is unknown).
    fn to_geometry(
        &self,
        coords: &CoordinateTransformer,
        class: Option<&StyleClass>,
    ) -> Result<OutputGeometry, CurveFitFailure>;
}

/// The leading `(a, b)` column of a `matrix(a b c d e f)` transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub cos: f64,
    pub sin: f64,
}

impl Rotation {
    pub fn angle(&self) -> Angle {
        decompose_angle(self.cos, self.sin)
    }
}

fn rotation_of(element: &'static str, attrs: &Attributes) -> Result<Option<Rotation>, ConvertError> {
    let Some(value) = attrs.get("transform") else {
        return Ok(None);
    };
    let [a, b, ..] = parse::matrix(element, value)?;
    Ok(Some(Rotation { cos: a, sin: b }))
}

fn owned_class(attrs: &Attributes) -> Option<String> {
    class_reference(attrs).map(str::to_string)
}

// ============================================================================
// Rectangle
// ============================================================================

/// `<rect x y width height class? transform?>`; `x`/`y` locate the centre.
#[derive(Debug, Clone, PartialEq)]
pub struct RectRecord {
    pub center: DVec2,
    pub size: DVec2,
    pub class: Option<String>,
    pub rotation: Option<Rotation>,
}

impl RectRecord {
    fn parse(attrs: &Attributes) -> Result<Self, ConvertError> {
        const TAG: &str = "rect";
        Ok(Self {
            center: dvec2(
                parse::number_or(TAG, attrs, "x", 0.0)?,
                parse::number_or(TAG, attrs, "y", 0.0)?,
            ),
            size: dvec2(
                parse::required_number(TAG, attrs, "width")?,
                parse::required_number(TAG, attrs, "height")?,
            ),
            class: owned_class(attrs),
            rotation: rotation_of(TAG, attrs)?,
        })
    }
}

impl ToGeometry for RectRecord {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Rect
    }

    fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    fn to_geometry(
        &self,
        coords: &CoordinateTransformer,
        class: Option<&StyleClass>,
    ) -> Result<OutputGeometry, CurveFitFailure> {
        let center = coords.point(self.center);
        let size = dvec2(coords.length(self.size.x), coords.length(self.size.y));
        let geometry = match self.rotation {
            None => Geometry::Rect {
                origin: center - 0.5 * size,
                size,
            },
            Some(rotation) => Geometry::RotatedRect {
                corners: rotated_rectangle_corners(center, size.x, size.y, rotation.angle()),
            },
        };
        Ok(OutputGeometry::new(
            geometry,
            OutputStyle::Resolved(ResolvedStyle::resolve(class)),
        ))
    }
}

// ============================================================================
// Circle
// ============================================================================

/// `<circle cx cy r class?>`
#[derive(Debug, Clone, PartialEq)]
pub struct CircleRecord {
    pub center: DVec2,
    pub radius: f64,
    pub class: Option<String>,
}

impl CircleRecord {
    fn parse(attrs: &Attributes) -> Result<Self, ConvertError> {
        const TAG: &str = "circle";
        Ok(Self {
            center: dvec2(
                parse::number_or(TAG, attrs, "cx", 0.0)?,
                parse::number_or(TAG, attrs, "cy", 0.0)?,
            ),
            radius: parse::required_number(TAG, attrs, "r")?,
            class: owned_class(attrs),
        })
    }
}

impl ToGeometry for CircleRecord {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Circle
    }

    fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    fn to_geometry(
        &self,
        coords: &CoordinateTransformer,
        class: Option<&StyleClass>,
    ) -> Result<OutputGeometry, CurveFitFailure> {
        Ok(OutputGeometry::new(
            Geometry::Circle {
                center: coords.point(self.center),
                radius: coords.length(self.radius),
            },
            OutputStyle::Resolved(ResolvedStyle::resolve(class)),
        ))
    }
}

// ============================================================================
// Ellipse
// ============================================================================

/// `<ellipse cx cy rx ry class? transform?>`
#[derive(Debug, Clone, PartialEq)]
pub struct EllipseRecord {
    pub center: DVec2,
    pub radii: DVec2,
    pub class: Option<String>,
    pub rotation: Option<Rotation>,
}

impl EllipseRecord {
    fn parse(attrs: &Attributes) -> Result<Self, ConvertError> {
        const TAG: &str = "ellipse";
        Ok(Self {
            center: dvec2(
                parse::number_or(TAG, attrs, "cx", 0.0)?,
                parse::number_or(TAG, attrs, "cy", 0.0)?,
            ),
            radii: dvec2(
                parse::required_number(TAG, attrs, "rx")?,
                parse::required_number(TAG, attrs, "ry")?,
            ),
            class: owned_class(attrs),
            rotation: rotation_of(TAG, attrs)?,
        })
    }
}

impl ToGeometry for EllipseRecord {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Ellipse
    }

    fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    fn to_geometry(
        &self,
        coords: &CoordinateTransformer,
        class: Option<&StyleClass>,
    ) -> Result<OutputGeometry, CurveFitFailure> {
        let center = coords.point(self.center);
        let radii = dvec2(coords.length(self.radii.x), coords.length(self.radii.y));
        let rotation = self.rotation.map_or(Angle::ZERO, |r| r.angle());
        let (start, end) = ellipse_axis_endpoints(center, radii.x, rotation);
        Ok(OutputGeometry::new(
            Geometry::Ellipse {
                start,
                end,
                radii,
                rotation,
            },
            OutputStyle::Resolved(ResolvedStyle::resolve(class)),
        ))
    }
}

// ============================================================================
// Line
// ============================================================================

/// `<line x1 y1 x2 y2 class?>`
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    pub from: DVec2,
    pub to: DVec2,
    pub class: Option<String>,
}

impl LineRecord {
    fn parse(attrs: &Attributes) -> Result<Self, ConvertError> {
        const TAG: &str = "line";
        let coord = |name| parse::number_or(TAG, attrs, name, 0.0);
        Ok(Self {
            from: dvec2(coord("x1")?, coord("y1")?),
            to: dvec2(coord("x2")?, coord("y2")?),
            class: owned_class(attrs),
        })
    }
}

impl ToGeometry for LineRecord {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Line
    }

    fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    fn to_geometry(
        &self,
        coords: &CoordinateTransformer,
        class: Option<&StyleClass>,
    ) -> Result<OutputGeometry, CurveFitFailure> {
        Ok(OutputGeometry::new(
            Geometry::Line {
                from: coords.point(self.from),
                to: coords.point(self.to),
            },
            OutputStyle::Resolved(ResolvedStyle::resolve(class)),
        ))
    }
}

// ============================================================================
// Path
// ============================================================================

/// `<path d>`
#[derive(Debug, Clone, PartialEq)]
pub struct PathRecord {
    pub commands: Vec<PathCommand>,
    pub class: Option<String>,
}

impl PathRecord {
    fn parse(attrs: &Attributes) -> Result<Self, ConvertError> {
        let d = attrs.get("d").ok_or(ConvertError::MissingAttribute {
            element: "path",
            attribute: "d",
        })?;
        Ok(Self {
            commands: parse::path_data(d)?,
            class: owned_class(attrs),
        })
    }
}

impl ToGeometry for PathRecord {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Path
    }

    fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    /// Paths always carry the placeholder style; the class is not consulted.
    fn to_geometry(
        &self,
        coords: &CoordinateTransformer,
        _class: Option<&StyleClass>,
    ) -> Result<OutputGeometry, CurveFitFailure> {
        Ok(OutputGeometry::new(
            Geometry::Path {
                vertices: approximate_path(&self.commands, coords)?,
            },
            OutputStyle::Placeholder {
                class: PATH_PLACEHOLDER_CLASS,
                stroke_width: PATH_PLACEHOLDER_STROKE_WIDTH,
            },
        ))
    }
}

// ============================================================================
// Polygon
// ============================================================================

/// `<polygon points>`
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonRecord {
    pub points: Vec<DVec2>,
    pub class: Option<String>,
}

impl PolygonRecord {
    fn parse(attrs: &Attributes) -> Result<Self, ConvertError> {
        let value = attrs.get("points").ok_or(ConvertError::MissingAttribute {
            element: "polygon",
            attribute: "points",
        })?;
        let points = parse::points("polygon", value)?;
        if points.is_empty() {
            return Err(ConvertError::invalid_attribute(
                "polygon",
                "points",
                value,
                0,
                "at least one coordinate pair",
            ));
        }
        Ok(Self {
            points,
            class: owned_class(attrs),
        })
    }
}

impl ToGeometry for PolygonRecord {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Polygon
    }

    fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    /// Vertices are scaled like lengths and the outline is closed by
    /// repeating the first one. The style is the fixed polygon placeholder.
    fn to_geometry(
        &self,
        coords: &CoordinateTransformer,
        _class: Option<&StyleClass>,
    ) -> Result<OutputGeometry, CurveFitFailure> {
        let mut points: Vec<DVec2> = self.points.iter().map(|p| coords.scaled_point(*p)).collect();
        if let Some(first) = points.first().copied() {
            points.push(first);
        }
        Ok(OutputGeometry::new(
            Geometry::Polygon { points },
            OutputStyle::Placeholder {
                class: POLYGON_PLACEHOLDER_CLASS,
                stroke_width: POLYGON_PLACEHOLDER_STROKE_WIDTH,
            },
        ))
    }
}

// ============================================================================
// Shape Enum
// ============================================================================

/// One parsed shape of any supported kind.
#[enum_dispatch(ToGeometry)]
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeRecord {
    Rect(RectRecord),
    Circle(CircleRecord),
    Ellipse(EllipseRecord),
    Line(LineRecord),
    Path(PathRecord),
    Polygon(PolygonRecord),
}

impl ShapeRecord {
    /// Type the attributes of one shape tag.
    pub fn parse(kind: ShapeKind, attrs: &Attributes) -> Result<Self, ConvertError> {
        Ok(match kind {
            ShapeKind::Rect => RectRecord::parse(attrs)?.into(),
            ShapeKind::Circle => CircleRecord::parse(attrs)?.into(),
            ShapeKind::Ellipse => EllipseRecord::parse(attrs)?.into(),
            ShapeKind::Line => LineRecord::parse(attrs)?.into(),
            ShapeKind::Path => PathRecord::parse(attrs)?.into(),
            ShapeKind::Polygon => PolygonRecord::parse(attrs)?.into(),
        })
    }
}
