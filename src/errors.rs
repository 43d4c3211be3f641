//! Error and warning types with rich diagnostics using miette
//!
//! Hard errors abort the conversion of a document. Warnings record a
//! non-fatal recovery (a skipped style key, an unknown class) and are
//! collected on the [`Conversion`](crate::Conversion) in document order.

use glam::DVec2;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// Curve fitting
// ============================================================================

/// Why a curve could not be turned into line segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveFitReason {
    /// The least-squares iteration ran out of budget.
    DidNotConverge { iterations: usize },
    /// The model produced NaN or an infinity for these control points.
    NonFinite,
    /// The spline abscissae are not strictly monotonic.
    NonMonotonic,
}

impl std::fmt::Display for CurveFitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurveFitReason::DidNotConverge { iterations } => {
                write!(f, "did not converge after {} iterations", iterations)
            }
            CurveFitReason::NonFinite => write!(f, "fit produced non-finite values"),
            CurveFitReason::NonMonotonic => write!(f, "x coordinates are not strictly monotonic"),
        }
    }
}

/// A cubic segment that could not be approximated.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
#[error("curve fit failed ({reason}) for control points {}", fmt_points(.points))]
#[diagnostic(
    code(s100svg::curve::fit_failure),
    help("the segment cannot be approximated; simplify the path in the source drawing")
)]
pub struct CurveFitFailure {
    pub points: [DVec2; 3],
    pub reason: CurveFitReason,
}

fn fmt_points(points: &[DVec2; 3]) -> String {
    points
        .iter()
        .map(|p| format!("({}, {})", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Conversion errors
// ============================================================================

/// Errors that abort the conversion of a document
#[derive(Error, Diagnostic, Debug)]
pub enum ConvertError {
    #[error("<{element}> appears before the document header")]
    #[diagnostic(
        code(s100svg::convert::missing_header),
        help("the <svg> header with a viewBox must come before any shape")
    )]
    MissingHeader { element: &'static str },

    #[error("invalid viewBox: {value:?}")]
    #[diagnostic(
        code(s100svg::convert::invalid_view_box),
        help("expected four numbers \"minX minY width height\" with a positive width and height")
    )]
    InvalidViewBox { value: String },

    #[error("invalid {attribute} on <{element}>: expected {expected}")]
    #[diagnostic(code(s100svg::convert::invalid_attribute))]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        expected: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("<{element}> is missing its {attribute} attribute")]
    #[diagnostic(code(s100svg::convert::missing_attribute))]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    CurveFit(#[from] CurveFitFailure),
}

impl ConvertError {
    /// Build an [`ConvertError::InvalidAttribute`] pointing at `offset` in `value`.
    pub fn invalid_attribute(
        element: &'static str,
        attribute: &'static str,
        value: &str,
        offset: usize,
        expected: impl Into<String>,
    ) -> Self {
        let offset = offset.min(value.len());
        let len = if offset < value.len() { 1 } else { 0 };
        ConvertError::InvalidAttribute {
            element,
            attribute,
            expected: expected.into(),
            src: NamedSource::new(format!("<{}> {}", element, attribute), value.to_string()),
            span: (offset, len).into(),
        }
    }
}

// ============================================================================
// Warnings
// ============================================================================

/// Non-fatal recoveries made during a conversion
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum Warning {
    #[error("style .{class}: skipped malformed {key} value {value:?}")]
    #[diagnostic(
        code(s100svg::style::malformed_key),
        severity(Warning),
        help("the key keeps its default value")
    )]
    MalformedStyleKey {
        class: String,
        key: String,
        value: String,
    },

    #[error("style .{class}: ignored unsupported key {key}")]
    #[diagnostic(code(s100svg::style::unknown_key), severity(Warning))]
    UnknownStyleKey { class: String, key: String },

    #[error("class {class:?} is not defined; shape converted without style")]
    #[diagnostic(
        code(s100svg::style::unresolved_class),
        severity(Warning),
        help("style rules must be defined before the shapes that use them")
    )]
    UnresolvedClassReference { class: String },

    #[error("ignored second document header with viewBox {view_box:?}")]
    #[diagnostic(code(s100svg::convert::duplicate_header), severity(Warning))]
    DuplicateHeader { view_box: String },
}
