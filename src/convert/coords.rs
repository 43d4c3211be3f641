//! Source space -> S-100 space
//!
//! Illustrator puts the origin at the top-left of the artboard; the S-100
//! portrayal toolkit puts it at the symbol's pivot point, the artboard
//! centre. Positions are re-centred and divided by the sub-unit grid;
//! lengths are multiplied by [`LENGTH_SCALE`].

use glam::DVec2;

use super::defaults::{LENGTH_SCALE, SUB_UNIT_GRID};

/// Convert a raw position to output space, centred on `center`.
#[inline]
pub fn to_output_point(raw: DVec2, center: DVec2) -> DVec2 {
    (raw - center) / SUB_UNIT_GRID
}

/// Convert a raw length to output units.
#[inline]
pub fn to_output_length(raw: f64) -> f64 {
    raw * LENGTH_SCALE
}

/// The centering offsets of one document, fixed by its header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransformer {
    center: DVec2,
}

impl CoordinateTransformer {
    pub fn new(center: DVec2) -> Self {
        Self { center }
    }

    /// Centre on half of the declared viewBox size, each side rounded up.
    pub fn from_view_box(width: f64, height: f64) -> Self {
        Self::new(DVec2::new(width.ceil(), height.ceil()) / 2.0)
    }

    pub fn center(&self) -> DVec2 {
        self.center
    }

    /// A position on the sub-unit grid (rects, circles, ellipses, lines).
    pub fn point(&self, raw: DVec2) -> DVec2 {
        to_output_point(raw, self.center)
    }

    /// A relative displacement (lowercase path commands): no re-centring.
    pub fn offset(&self, raw: DVec2) -> DVec2 {
        raw / SUB_UNIT_GRID
    }

    /// A position scaled like a length (polygon vertices).
    pub fn scaled_point(&self, raw: DVec2) -> DVec2 {
        (raw - self.center) * LENGTH_SCALE
    }

    pub fn length(&self, raw: f64) -> f64 {
        to_output_length(raw)
    }
}
