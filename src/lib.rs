//! Convert Adobe Illustrator SVG shapes into the S-100 portrayal SVG profile.
//!
//! Illustrator exports artwork in point units with the origin at the top-left
//! of the artboard and styles expressed as CSS classes. S-100 symbols are
//! drawn in millimetres around a pivot point at the origin, with a handful
//! of class conventions of their own. This crate is the conversion engine in
//! between: it takes the elements of one document in order (header, style
//! rules, text, shapes) and returns one [`OutputGeometry`] per shape.
//!
//! ```
//! use s100svg::{Element, ShapeKind, convert};
//!
//! let conversion = convert([
//!     Element::header("0 0 200 200"),
//!     Element::style_rule(".st1{fill:none;stroke:#000000;}"),
//!     Element::shape(ShapeKind::Circle, [("cx", "100"), ("cy", "100"), ("r", "10"), ("class", "st1")]),
//! ])?;
//!
//! assert_eq!(conversion.geometry.len(), 1);
//! assert!(conversion.body().contains(r#"fill="none""#));
//! # Ok::<(), s100svg::ConvertError>(())
//! ```
//!
//! Splitting raw markup into [`Element`]s and writing the final document
//! around [`Conversion::body`] are left to the caller.

pub mod convert;
pub mod element;
pub mod errors;
pub mod log;
pub mod parse;
pub mod style;
pub mod types;

pub use convert::{Conversion, Geometry, OutputGeometry, OutputStyle, convert};
pub use element::{Attributes, Element, ShapeKind};
pub use errors::{ConvertError, CurveFitFailure, CurveFitReason, Warning};
pub use style::{Fill, StyleClass, StyleTable};
pub use types::{Angle, Color, Opacity, StrokeWidth};
