//! Rotation recovery for `transform="matrix(...)"`
//!
//! Illustrator writes rotated rectangles and ellipses as an axis-aligned
//! primitive plus a matrix. Only pure rotations are modeled: the angle comes
//! from the first column `(a, b)` and shear/scale terms are ignored.

use glam::{DVec2, dvec2};

use crate::types::Angle;

/// Rotation magnitude in whole degrees from the leading matrix components.
///
/// The sign is dropped: a rotation of -30° and one of +30° decompose to the
/// same angle.
pub fn decompose_angle(m0: f64, m1: f64) -> Angle {
    Angle(m1.atan2(m0).to_degrees().round().abs())
}

/// Unit vectors along the rotated width axis and its perpendicular (Y-down).
fn rotated_axes(angle: Angle) -> (DVec2, DVec2) {
    let (sin, cos) = angle.radians().sin_cos();
    (dvec2(cos, -sin), dvec2(sin, cos))
}

/// Corners of a `width` x `height` rectangle centred on `center` and rotated
/// by `angle`.
///
/// The first two corners are the ends of the width axis pushed back by half
/// the height, the last two the same ends pushed forward, visited so the
/// outline `p1 p2 p3 p4 p1` never crosses itself.
pub fn rotated_rectangle_corners(center: DVec2, width: f64, height: f64, angle: Angle) -> [DVec2; 4] {
    let (along, across) = rotated_axes(angle);
    let start = center - along * (0.5 * width);
    let end = center + along * (0.5 * width);
    let half_height = across * (0.5 * height);
    [
        start - half_height,
        end - half_height,
        end + half_height,
        start + half_height,
    ]
}

/// Start and end of an ellipse's rotated major axis: the points its two
/// half-arcs join at.
pub fn ellipse_axis_endpoints(center: DVec2, rx: f64, angle: Angle) -> (DVec2, DVec2) {
    let (along, _) = rotated_axes(angle);
    (center - along * rx, center + along * rx)
}
