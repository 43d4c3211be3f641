//! Curve Approximator: path commands to polyline vertices
//!
//! The target profile draws paths from straight segments only, so each cubic
//! is replaced by samples of a fitted curve:
//!
//! - absolute `C`: an exponential `a·e^(b·x)` fitted through the three control
//!   points after reflecting them about the first point's height, sampled
//!   [`CUBIC_SAMPLES`] times from the first x towards the last;
//! - relative `c`: a natural cubic spline through control points accumulated
//!   from the pen, sampled [`SPLINE_SAMPLES_PER_INTERVAL`] times per interval.
//!
//! A fit that fails is a hard error carrying the offending control points.

use glam::{DMat2, DVec2, dvec2};

use super::coords::CoordinateTransformer;
use super::defaults::{
    COLLINEAR_TOLERANCE, CUBIC_SAMPLES, FIT_FTOL, FIT_MAX_ITERATIONS, FIT_XTOL,
    SPLINE_SAMPLES_PER_INTERVAL,
};
use crate::errors::{CurveFitFailure, CurveFitReason};
use crate::log::{debug, trace};

/// One path command with its arguments in source units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// `M x,y`
    MoveTo(DVec2),
    /// `L x,y`
    LineTo(DVec2),
    /// `l dx,dy`
    LineBy(DVec2),
    /// `H x`
    HorizontalTo(f64),
    /// `h dx`
    HorizontalBy(f64),
    /// `V y`
    VerticalTo(f64),
    /// `v dy`
    VerticalBy(f64),
    /// `C x1,y1 x2,y2 x,y`
    CubicTo([DVec2; 3]),
    /// `c dx1,dy1 dx2,dy2 dx,dy`
    CubicBy([DVec2; 3]),
    /// `z` / `Z`
    Close,
}

/// One emitted vertex, in output space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathVertex {
    MoveTo(DVec2),
    LineTo(DVec2),
    Close,
}

impl PathVertex {
    pub fn point(&self) -> Option<DVec2> {
        match self {
            PathVertex::MoveTo(p) | PathVertex::LineTo(p) => Some(*p),
            PathVertex::Close => None,
        }
    }
}

// ============================================================================
// Path interpretation
// ============================================================================

/// Walks path commands in order, tracking the pen position.
///
/// The pen starts at the output origin. Absolute arguments are re-centred,
/// relative ones only divided by the sub-unit grid.
pub struct PathApproximator<'a> {
    coords: &'a CoordinateTransformer,
    pen: DVec2,
    subpath_start: DVec2,
    vertices: Vec<PathVertex>,
}

impl<'a> PathApproximator<'a> {
    pub fn new(coords: &'a CoordinateTransformer) -> Self {
        Self {
            coords,
            pen: DVec2::ZERO,
            subpath_start: DVec2::ZERO,
            vertices: Vec::new(),
        }
    }

    pub fn pen(&self) -> DVec2 {
        self.pen
    }

    fn line_to(&mut self, p: DVec2) {
        self.pen = p;
        self.vertices.push(PathVertex::LineTo(p));
    }

    pub fn apply(&mut self, command: &PathCommand) -> Result<(), CurveFitFailure> {
        match *command {
            PathCommand::MoveTo(p) => {
                let p = self.coords.point(p);
                self.pen = p;
                self.subpath_start = p;
                self.vertices.push(PathVertex::MoveTo(p));
            }
            PathCommand::LineTo(p) => self.line_to(self.coords.point(p)),
            PathCommand::LineBy(d) => self.line_to(self.pen + self.coords.offset(d)),
            PathCommand::HorizontalTo(x) => {
                let x = self.coords.point(dvec2(x, 0.0)).x;
                self.line_to(dvec2(x, self.pen.y));
            }
            PathCommand::HorizontalBy(dx) => {
                self.line_to(self.pen + self.coords.offset(dvec2(dx, 0.0)));
            }
            PathCommand::VerticalTo(y) => {
                let y = self.coords.point(dvec2(0.0, y)).y;
                self.line_to(dvec2(self.pen.x, y));
            }
            PathCommand::VerticalBy(dy) => {
                self.line_to(self.pen + self.coords.offset(dvec2(0.0, dy)));
            }
            PathCommand::CubicTo(ctrl) => {
                let points = ctrl.map(|p| self.coords.point(p));
                let samples = approximate_cubic(points)?;
                self.vertices
                    .extend(samples.into_iter().map(PathVertex::LineTo));
                self.pen = points[2];
            }
            PathCommand::CubicBy(ctrl) => {
                // The first control offset is not used: the fitted curve
                // passes through the pen and the two accumulated points.
                let p0 = self.pen;
                let p1 = p0 + self.coords.offset(ctrl[1]);
                let p2 = p1 + self.coords.offset(ctrl[2]);
                let samples = approximate_relative_cubic([p0, p1, p2])?;
                self.vertices
                    .extend(samples.into_iter().map(PathVertex::LineTo));
                self.pen = p2;
            }
            PathCommand::Close => {
                self.vertices.push(PathVertex::Close);
                self.pen = self.subpath_start;
            }
        }
        Ok(())
    }

    pub fn finish(self) -> Vec<PathVertex> {
        self.vertices
    }
}

/// Approximate a whole command list.
pub fn approximate_path(
    commands: &[PathCommand],
    coords: &CoordinateTransformer,
) -> Result<Vec<PathVertex>, CurveFitFailure> {
    let mut approx = PathApproximator::new(coords);
    for command in commands {
        approx.apply(command)?;
    }
    let vertices = approx.finish();
    debug!(
        commands = commands.len(),
        vertices = vertices.len(),
        "path approximated"
    );
    Ok(vertices)
}

// ============================================================================
// Absolute cubic: exponential fit
// ============================================================================

/// `n` evenly spaced parameters `k/n` over `[0, 1)`. The end is left out,
/// the same way each spline interval stops short of its last knot.
fn unit_samples(n: usize) -> impl Iterator<Item = f64> {
    let steps = n.max(1) as f64;
    (0..n).map(move |i| i as f64 / steps)
}

fn is_collinear([p1, p2, p3]: [DVec2; 3]) -> bool {
    let (a, b) = (p2 - p1, p3 - p1);
    let scale = a.length() * b.length();
    scale == 0.0 || a.perp_dot(b).abs() <= COLLINEAR_TOLERANCE * scale
}

/// Approximate an absolute cubic whose control points are already in
/// output space.
///
/// Samples start at the first control x and step a fifth of the way to the
/// last one; the last control point itself is not emitted.
pub fn approximate_cubic(points: [DVec2; 3]) -> Result<Vec<DVec2>, CurveFitFailure> {
    let [first, _, last] = points;

    // An exponential cannot follow a sloped line; sample the chord instead.
    if is_collinear(points) {
        trace!("collinear cubic, sampling the chord");
        return Ok(unit_samples(CUBIC_SAMPLES)
            .map(|t| first.lerp(last, t))
            .collect());
    }

    let pivot = first.y;
    let reflect = |p: DVec2| dvec2(p.x, 2.0 * pivot - p.y);
    let fit = ExponentialFit::through(&points.map(reflect))
        .map_err(|reason| CurveFitFailure { points, reason })?;
    debug!(a = fit.a, b = fit.b, "exponential fit");

    let samples: Vec<DVec2> = unit_samples(CUBIC_SAMPLES)
        .map(|t| {
            let x = first.x + t * (last.x - first.x);
            reflect(dvec2(x, fit.eval(x)))
        })
        .collect();
    if samples.iter().any(|p| !p.is_finite()) {
        return Err(CurveFitFailure {
            points,
            reason: CurveFitReason::NonFinite,
        });
    }
    Ok(samples)
}

/// `y = a·e^(b·x)`
#[derive(Debug, Clone, Copy, PartialEq)]
struct ExponentialFit {
    a: f64,
    b: f64,
}

impl ExponentialFit {
    fn eval(self, x: f64) -> f64 {
        self.a * (self.b * x).exp()
    }

    fn cost(self, points: &[DVec2; 3]) -> f64 {
        points.iter().map(|p| (self.eval(p.x) - p.y).powi(2)).sum()
    }

    /// Log-linear regression when every y has the same sign, otherwise a
    /// flat curve through the mean.
    fn initial_guess(points: &[DVec2; 3]) -> Self {
        let n = points.len() as f64;
        let mean_x = points.iter().map(|p| p.x).sum::<f64>() / n;
        let sxx: f64 = points.iter().map(|p| (p.x - mean_x).powi(2)).sum();
        let positive = points.iter().all(|p| p.y > 0.0);
        let negative = points.iter().all(|p| p.y < 0.0);

        if (positive || negative) && sxx > 0.0 {
            let sign = if positive { 1.0 } else { -1.0 };
            let logs = points.map(|p| (sign * p.y).ln());
            let mean_log = logs.iter().sum::<f64>() / n;
            let sxy: f64 = points
                .iter()
                .zip(logs)
                .map(|(p, l)| (p.x - mean_x) * (l - mean_log))
                .sum();
            let b = sxy / sxx;
            Self {
                a: sign * (mean_log - b * mean_x).exp(),
                b,
            }
        } else {
            Self {
                a: points.iter().map(|p| p.y).sum::<f64>() / n,
                b: 0.0,
            }
        }
    }

    /// `JᵀJ` and `Jᵀr` for the current parameters.
    fn normal_equations(self, points: &[DVec2; 3]) -> (DMat2, DVec2) {
        let mut jtj = DMat2::ZERO;
        let mut jtr = DVec2::ZERO;
        for p in points {
            let e = (self.b * p.x).exp();
            let j = dvec2(e, self.a * p.x * e);
            let r = self.a * e - p.y;
            jtj += DMat2::from_cols(j * j.x, j * j.y);
            jtr += j * r;
        }
        (jtj, jtr)
    }

    /// Levenberg–Marquardt least squares through the points.
    fn through(points: &[DVec2; 3]) -> Result<Self, CurveFitReason> {
        let mut fit = Self::initial_guess(points);
        let mut cost = fit.cost(points);
        if !cost.is_finite() || !fit.a.is_finite() || !fit.b.is_finite() {
            return Err(CurveFitReason::NonFinite);
        }

        let mut lambda = 1e-3;
        for _ in 0..FIT_MAX_ITERATIONS {
            if cost <= f64::MIN_POSITIVE {
                return Ok(fit);
            }

            let (jtj, jtr) = fit.normal_equations(points);
            let diagonal = dvec2(jtj.x_axis.x, jtj.y_axis.y).max(DVec2::splat(1e-12));
            let system = jtj + DMat2::from_diagonal(diagonal * lambda);
            let det = system.determinant();
            if !det.is_normal() {
                lambda *= 10.0;
                continue;
            }

            let step = -(system.inverse() * jtr);
            let candidate = Self {
                a: fit.a + step.x,
                b: fit.b + step.y,
            };
            let candidate_cost = candidate.cost(points);

            if candidate_cost.is_finite() && candidate_cost < cost {
                let reduction = (cost - candidate_cost) / cost;
                fit = candidate;
                cost = candidate_cost;
                lambda = (lambda / 10.0).max(1e-12);
                trace!(a = fit.a, b = fit.b, cost, "fit step accepted");

                let scale = dvec2(fit.a, fit.b).length();
                if step.length() <= FIT_XTOL * (scale + FIT_XTOL) || reduction <= FIT_FTOL {
                    return Ok(fit);
                }
            } else {
                lambda *= 10.0;
                // No damped step lowers the cost any more: we are sitting on
                // the minimum to machine precision.
                if lambda > 1e16 {
                    return Ok(fit);
                }
            }
        }

        Err(CurveFitReason::DidNotConverge {
            iterations: FIT_MAX_ITERATIONS,
        })
    }
}

// ============================================================================
// Relative cubic: natural cubic spline
// ============================================================================

/// Natural cubic spline through three knots with increasing x.
///
/// Second derivatives vanish at both ends, leaving only the middle one.
#[derive(Debug, Clone, Copy, PartialEq)]
struct NaturalSpline {
    knots: [DVec2; 3],
    middle_curvature: f64,
}

impl NaturalSpline {
    fn through(points: [DVec2; 3]) -> Result<Self, CurveFitReason> {
        let mut knots = points;
        if knots[0].x > knots[2].x {
            knots.reverse();
        }
        let h0 = knots[1].x - knots[0].x;
        let h1 = knots[2].x - knots[1].x;
        if !(h0 > 0.0 && h1 > 0.0) {
            return Err(CurveFitReason::NonMonotonic);
        }

        let slope0 = (knots[1].y - knots[0].y) / h0;
        let slope1 = (knots[2].y - knots[1].y) / h1;
        let middle_curvature = 3.0 * (slope1 - slope0) / (h0 + h1);
        if !middle_curvature.is_finite() {
            return Err(CurveFitReason::NonFinite);
        }
        Ok(Self {
            knots,
            middle_curvature,
        })
    }

    fn eval(&self, x: f64) -> f64 {
        let (i, m_left, m_right) = if x <= self.knots[1].x {
            (0, 0.0, self.middle_curvature)
        } else {
            (1, self.middle_curvature, 0.0)
        };
        let (k0, k1) = (self.knots[i], self.knots[i + 1]);
        let h = k1.x - k0.x;
        let (dl, dr) = (k1.x - x, x - k0.x);
        m_left * dl.powi(3) / (6.0 * h)
            + m_right * dr.powi(3) / (6.0 * h)
            + (k0.y / h - m_left * h / 6.0) * dl
            + (k1.y / h - m_right * h / 6.0) * dr
    }
}

/// Approximate a relative cubic from its three accumulated absolute points.
///
/// Each of the two intervals contributes [`SPLINE_SAMPLES_PER_INTERVAL`]
/// vertices, starting at the interval's first knot.
pub fn approximate_relative_cubic(points: [DVec2; 3]) -> Result<Vec<DVec2>, CurveFitFailure> {
    let spline =
        NaturalSpline::through(points).map_err(|reason| CurveFitFailure { points, reason })?;

    let per_interval = SPLINE_SAMPLES_PER_INTERVAL;
    let mut samples = Vec::with_capacity(2 * per_interval);
    for pair in points.windows(2) {
        let (from, to) = (pair[0].x, pair[1].x);
        for k in 0..per_interval {
            let x = from + (k as f64 / per_interval as f64) * (to - from);
            samples.push(dvec2(x, spline.eval(x)));
        }
    }
    Ok(samples)
}
