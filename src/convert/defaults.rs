//! Fixed conversion constants (Illustrator points -> S-100 millimetres)

/// Millimetres per typographic point.
pub const MM_PER_POINT: f64 = 0.352_777_777_8;

/// Additional scale from the source drawing to the S-100 symbol grid.
pub const SYMBOL_SCALE: f64 = 0.039_408_866_995;

/// Length scale K applied to every converted length and centering offset.
pub const LENGTH_SCALE: f64 = MM_PER_POINT * SYMBOL_SCALE;

/// Source sub-unit grid: positions are divided by this.
pub const SUB_UNIT_GRID: f64 = 100.0;

/// Factor applied to style stroke widths at parse time and again on output.
pub const STROKE_SCALE: f64 = 0.32;

/// Stroke width a shape uses when its style leaves the width unset.
pub const SHAPE_STROKE_WIDTH: f64 = 0.32;

/// Class and stroke width appended to every converted `<path>`.
pub const PATH_PLACEHOLDER_CLASS: &str = "s1 f0 sCHBLK";
pub const PATH_PLACEHOLDER_STROKE_WIDTH: f64 = 0.32;

/// Class and stroke width used for every converted `<polygon>`.
pub const POLYGON_PLACEHOLDER_CLASS: &str = "s#00AEEF";
pub const POLYGON_PLACEHOLDER_STROKE_WIDTH: f64 = 0.32;

/// Number of vertices sampled from an absolute cubic.
pub const CUBIC_SAMPLES: usize = 5;

/// Vertices sampled per spline interval of a relative cubic.
pub const SPLINE_SAMPLES_PER_INTERVAL: usize = 10;

/// Iteration budget of the exponential least-squares fit.
pub const FIT_MAX_ITERATIONS: usize = 200;

/// Relative step size below which the fit counts as converged.
pub const FIT_XTOL: f64 = 1e-10;

/// Relative cost reduction below which the fit counts as converged.
pub const FIT_FTOL: f64 = 1e-12;

/// Sine of the angle at the first control point under which three control
/// points count as collinear.
pub const COLLINEAR_TOLERANCE: f64 = 1e-9;

pub const DEFAULT_TITLE: &str = "This is the default title";
pub const DEFAULT_DESCRIPTION: &str = "This is the default description";

/// The fixed window every S-100 symbol document is written into.
pub const TARGET_WIDTH: &str = "3.33mm";
pub const TARGET_HEIGHT: &str = "2.78mm";
pub const TARGET_VIEW_BOX: &str = "-0.5 -0.5 3.33 2.78";
