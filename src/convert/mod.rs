//! Geometry and style conversion for Illustrator SVG documents
//!
//! This module is organized into submodules:
//! - `defaults`: Conversion constants (length scale, stroke scale, placeholders)
//! - `coords`: Coordinate Transformer (re-centring and unit scaling)
//! - `affine`: Rotation recovery and rotated-rectangle reconstruction
//! - `curve`: Path interpretation and cubic-to-polyline approximation
//! - `shapes`: Shape records and the Shape Transformer
//! - `output`: Output geometry and element fragments
//! - `context`: ConversionSession, the state of one conversion pass

pub mod affine;
pub mod context;
pub mod coords;
pub mod curve;
pub mod defaults;
pub mod output;
pub mod shapes;

pub use context::ConversionSession;
pub use output::{Geometry, OutputGeometry, OutputStyle};
pub use shapes::{ShapeRecord, ToGeometry};

use glam::DVec2;

use crate::element::Element;
use crate::errors::{ConvertError, Warning};

/// Result of converting one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// Converted shapes in document order.
    pub geometry: Vec<OutputGeometry>,
    /// Non-fatal recoveries in document order.
    pub warnings: Vec<Warning>,
    pub title: String,
    pub description: String,
    /// Centering offset taken from the header, `None` if there was none.
    pub center: Option<DVec2>,
}

impl Conversion {
    /// The converted elements, one per line, for the Document Writer.
    pub fn body(&self) -> String {
        self.geometry
            .iter()
            .map(|g| g.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Convert an ordered element sequence.
///
/// The fold stops at the first hard error; warnings are collected on the
/// returned [`Conversion`].
pub fn convert(elements: impl IntoIterator<Item = Element>) -> Result<Conversion, ConvertError> {
    let mut session = ConversionSession::new();
    for element in elements {
        session.process(element)?;
    }
    Ok(session.finish())
}
