//! Linear-in-time motion along an edge.

use nalgebra::{Point2, Vector2};

use crate::Edge;

/// Affine motion `p(t) = velocity * (t - origin) + intercept` along one edge.
///
/// With `origin == 0` the components are the slope/intercept pairs of the
/// two-point line formula: `x(t) = xk * t + xb`, `y(t) = yk * t + yb`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeMotion {
    /// `(xk, yk)`.
    pub velocity: Vector2<f64>,
    /// Position at `origin`, i.e. `(xb, yb)` when `origin == 0`.
    pub intercept: Vector2<f64>,
    /// Time at which `intercept` is taken.
    pub origin: f64,
}

impl EdgeMotion {
    /// Derive the motion of `edge` with the intercept taken at `origin`.
    ///
    /// Evaluates exactly to the edge endpoints at `start.t` and `end.t` (up to
    /// rounding). Shifting the origin close to the edge keeps the intercept on
    /// the scale of the coordinates even for large absolute timestamps.
    pub fn about(edge: &Edge, origin: f64) -> Self {
        let start = edge.start();
        let end = edge.end();
        let span = end.t - start.t;

        let velocity = (end.position() - start.position()) / span;

        // Two-point form, relative to the origin
        let ts = start.t - origin;
        let te = end.t - origin;
        let intercept = (start.position().coords * te - end.position().coords * ts) / span;

        Self {
            velocity,
            intercept,
            origin,
        }
    }

    /// Slope/intercept coefficients `(xk, xb, yk, yb)`.
    #[inline]
    pub fn coefficients(&self) -> (f64, f64, f64, f64) {
        (
            self.velocity.x,
            self.intercept.x,
            self.velocity.y,
            self.intercept.y,
        )
    }

    /// Interpolated (or extrapolated) position at time `t`.
    #[inline]
    pub fn position_at(&self, t: f64) -> Point2<f64> {
        Point2::from(self.velocity * (t - self.origin) + self.intercept)
    }
}

/// Derive the motion of `edge` in absolute time (origin 0).
///
/// The edge guarantees a positive time span, so the slope is always defined.
pub fn derive_motion(edge: &Edge) -> EdgeMotion {
    EdgeMotion::about(edge, 0.0)
}
