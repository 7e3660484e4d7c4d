//! Pairwise close-distance solver (CDD).
//!
//! Two edges that overlap in time move linearly, so the squared distance
//! between the interpolated positions is a quadratic in time:
//!
//! ```text
//! d²(τ) = a·τ² + b·τ + c,   τ = t - window_lo
//! ```
//!
//! with `Δv` the velocity difference and `Δp` the position difference at
//! `window_lo`:
//!
//! ```text
//! a = |Δv|²,   b = 2·(Δv · Δp),   c = |Δp|²
//! ```
//!
//! The close-distance duration is the length of `{τ ∈ [0, L] : d²(τ) ≤ r²}`,
//! found in closed form per case (constant, linear, quadratic).

use crate::config::{CddsConfig, DEFAULT_EPSILON};
use crate::{Edge, EdgeMotion, Result};

/// Squared distance between two linearly moving points as a polynomial in
/// local time `τ`.
///
/// `reference` is the largest squared coordinate magnitude the coefficients
/// were computed from. It sets the floor of the zero tolerance, so rounding
/// noise in coefficients that should be exactly zero is recognised as such.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquaredDistance {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub reference: f64,
}

impl SquaredDistance {
    /// Polynomial with explicit coefficients and no coordinate reference.
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self {
            a,
            b,
            c,
            reference: 0.0,
        }
    }

    /// Squared distance between two motions over a window of length
    /// `window_len` starting at their common origin.
    pub fn between(m1: &EdgeMotion, m2: &EdgeMotion, window_len: f64) -> Self {
        debug_assert_eq!(m1.origin, m2.origin, "motions must share a time origin");

        let dv = m1.velocity - m2.velocity;
        let dp = m1.intercept - m2.intercept;

        let reference = [
            m1.intercept,
            m2.intercept,
            m1.intercept + m1.velocity * window_len,
            m2.intercept + m2.velocity * window_len,
        ]
        .iter()
        .map(|p| p.norm_squared())
        .fold(0.0, f64::max);

        Self {
            a: dv.norm_squared(),
            b: 2.0 * dv.dot(&dp),
            c: dp.norm_squared(),
            reference,
        }
    }

    /// Evaluate `d²(τ)`.
    #[inline]
    pub fn eval(&self, tau: f64) -> f64 {
        (self.a * tau + self.b) * tau + self.c
    }

    /// Length of the part of `[0, window_len]` where `d²(τ) ≤ threshold_sq`.
    ///
    /// Coefficient classification uses the tolerance rule below rather than
    /// exact comparisons. With
    ///
    /// ```text
    /// scale = max(a·L², |b|·L, c, threshold_sq, reference)
    /// tol   = epsilon² · scale
    /// ```
    ///
    /// `a` is zero iff `a·L² ≤ tol`, `b` iff `|b|·L ≤ tol`, `c` iff `c ≤ tol`.
    /// Terms that overflowed to infinity are left out of `scale`.
    /// Every branch returns `max(0, hi - lo)` of the clipped interval, so a
    /// single-instant contact contributes nothing.
    ///
    /// Coefficients beyond `f64` range give 0: such a distance never falls
    /// within a representable threshold. A threshold whose square overflows
    /// covers the whole window.
    pub fn duration_within(&self, threshold_sq: f64, window_len: f64, epsilon: f64) -> f64 {
        let len = window_len;
        if !(self.a.is_finite() && self.b.is_finite() && self.c.is_finite()) {
            return 0.0;
        }
        if threshold_sq == f64::INFINITY {
            return len;
        }

        let a_term = self.a * len * len;
        let b_term = self.b.abs() * len;

        let scale = [a_term, b_term, self.c, threshold_sq, self.reference]
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max);
        let tol = epsilon * epsilon * scale;

        let a_zero = a_term <= tol;
        let b_zero = b_term <= tol;
        let c_zero = self.c <= tol;

        if a_zero && b_zero {
            // Same velocity: the distance is constant over the window
            if c_zero || self.c <= threshold_sq {
                return len;
            }
            return 0.0;
        }

        if a_zero {
            // Linear in τ: between the zero crossing and the threshold crossing
            let t_zero = -self.c / self.b;
            let t_thr = (threshold_sq - self.c) / self.b;
            return clipped_length(t_zero.min(t_thr), t_zero.max(t_thr), len);
        }

        let c_shift = self.c - threshold_sq;
        let theta = self.b * self.b - 4.0 * self.a * c_shift;
        if theta <= 0.0 {
            return 0.0;
        }

        // Cancellation-free roots
        let q = -0.5 * (self.b + self.b.signum() * theta.sqrt());
        let r1 = q / self.a;
        let r2 = c_shift / q;
        clipped_length(r1.min(r2), r1.max(r2), len)
    }
}

/// Length of `[lo, hi] ∩ [0, len]`, or 0 if empty or a single point.
#[inline]
fn clipped_length(lo: f64, hi: f64, len: f64) -> f64 {
    let lo = lo.max(0.0);
    let hi = hi.min(len);
    if hi > lo {
        hi - lo
    } else {
        0.0
    }
}

/// Close-distance duration of two edges given a squared threshold.
///
/// Returns 0 immediately when the edges do not overlap in time.
pub(crate) fn close_distance_duration(e1: &Edge, e2: &Edge, threshold_sq: f64, epsilon: f64) -> f64 {
    let Some((lo, hi)) = e1.time_window(e2) else {
        return 0.0;
    };

    let len = hi - lo;
    let m1 = EdgeMotion::about(e1, lo);
    let m2 = EdgeMotion::about(e2, lo);

    SquaredDistance::between(&m1, &m2, len).duration_within(threshold_sq, len, epsilon)
}

/// Close-distance duration (CDD) of two edges.
///
/// Time within the edges' common window during which the interpolated
/// positions are at most `threshold` apart. The result lies in
/// `[0, min(e1.duration(), e2.duration())]`.
///
/// # Errors
/// `InvalidThreshold` if `threshold` is negative or not finite.
pub fn cdd(e1: &Edge, e2: &Edge, threshold: f64) -> Result<f64> {
    CddsConfig::new(threshold).validate()?;
    Ok(close_distance_duration(
        e1,
        e2,
        threshold * threshold,
        DEFAULT_EPSILON,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cdds, Error, Sample};
    use approx::assert_relative_eq;

    fn edge(a: (f64, f64, f64), b: (f64, f64, f64)) -> Edge {
        Edge::new(Sample::from(a), Sample::from(b)).unwrap()
    }

    // ===== SquaredDistance branches =====

    #[test]
    fn test_constant_distance_within_threshold() {
        let d = SquaredDistance::new(0.0, 0.0, 4.0);
        assert_relative_eq!(d.duration_within(9.0, 10.0, DEFAULT_EPSILON), 10.0);
    }

    #[test]
    fn test_constant_distance_on_threshold_counts() {
        let d = SquaredDistance::new(0.0, 0.0, 9.0);
        assert_relative_eq!(d.duration_within(9.0, 10.0, DEFAULT_EPSILON), 10.0);
    }

    #[test]
    fn test_constant_distance_beyond_threshold() {
        let d = SquaredDistance::new(0.0, 0.0, 25.0);
        assert_eq!(d.duration_within(9.0, 10.0, DEFAULT_EPSILON), 0.0);
    }

    #[test]
    fn test_coincident_with_zero_threshold() {
        let d = SquaredDistance::new(0.0, 0.0, 0.0);
        assert_relative_eq!(d.duration_within(0.0, 3.5, DEFAULT_EPSILON), 3.5);
        assert_relative_eq!(d.duration_within(0.0, 3.5, 0.0), 3.5);
    }

    #[test]
    fn test_linear_increasing() {
        // d² = 2τ + 1: zero crossing at -0.5, threshold crossing at 4
        let d = SquaredDistance::new(0.0, 2.0, 1.0);
        assert_relative_eq!(d.duration_within(9.0, 10.0, DEFAULT_EPSILON), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_linear_decreasing() {
        // d² = -2τ + 10: threshold crossing at 3, zero crossing at 5
        let d = SquaredDistance::new(0.0, -2.0, 10.0);
        assert_relative_eq!(d.duration_within(4.0, 10.0, DEFAULT_EPSILON), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_linear_degenerate_instant_is_zero() {
        // Zero threshold: both crossings coincide at τ = 5
        let d = SquaredDistance::new(0.0, -2.0, 10.0);
        assert_eq!(d.duration_within(0.0, 10.0, DEFAULT_EPSILON), 0.0);
    }

    #[test]
    fn test_linear_outside_window() {
        // Threshold crossing at τ = 12, beyond the window
        let d = SquaredDistance::new(0.0, -1.0, 16.0);
        assert_eq!(d.duration_within(4.0, 10.0, DEFAULT_EPSILON), 0.0);
    }

    #[test]
    fn test_quadratic_inside_window() {
        // d² = (τ - 5)², threshold 2: roots 3 and 7
        let d = SquaredDistance::new(1.0, -10.0, 25.0);
        assert_relative_eq!(d.duration_within(4.0, 10.0, DEFAULT_EPSILON), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quadratic_clipped_by_window() {
        let d = SquaredDistance::new(1.0, -10.0, 25.0);
        assert_relative_eq!(d.duration_within(4.0, 6.0, DEFAULT_EPSILON), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quadratic_never_close() {
        // Minimum d² = 10 > 4
        let d = SquaredDistance::new(1.0, 0.0, 10.0);
        assert_eq!(d.duration_within(4.0, 10.0, DEFAULT_EPSILON), 0.0);
    }

    #[test]
    fn test_quadratic_tangent_is_zero() {
        // (τ - 2)² + 4 touches the threshold 4 only at τ = 2
        let d = SquaredDistance::new(1.0, -4.0, 8.0);
        assert_eq!(d.duration_within(4.0, 10.0, DEFAULT_EPSILON), 0.0);
    }

    #[test]
    fn test_quadratic_b_zero() {
        // τ² - 4 ≤ 0 on [0, 2]; negative root clipped
        let d = SquaredDistance::new(1.0, 0.0, 0.0);
        assert_relative_eq!(d.duration_within(4.0, 10.0, DEFAULT_EPSILON), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_overflowing_distance_is_never_close() {
        let d = SquaredDistance {
            a: 0.0,
            b: 0.0,
            c: f64::INFINITY,
            reference: f64::INFINITY,
        };
        assert_eq!(d.duration_within(1.0, 10.0, DEFAULT_EPSILON), 0.0);
        assert_eq!(d.duration_within(1.0, 10.0, 0.0), 0.0);
    }

    #[test]
    fn test_overflowing_reference_keeps_exact_classification() {
        let d = SquaredDistance {
            a: 0.0,
            b: 0.0,
            c: 4.0,
            reference: f64::INFINITY,
        };
        assert_eq!(d.duration_within(1.0, 10.0, DEFAULT_EPSILON), 0.0);
        assert_eq!(d.duration_within(9.0, 10.0, DEFAULT_EPSILON), 10.0);
    }

    #[test]
    fn test_overflowing_threshold_covers_window() {
        let d = SquaredDistance::new(1.0, 2.0, 3.0);
        assert_eq!(d.duration_within(f64::INFINITY, 10.0, DEFAULT_EPSILON), 10.0);
    }

    #[test]
    fn test_cdd_far_apart_beyond_f64_range() {
        let e1 = edge((0.0, 0.0, 0.0), (0.0, 0.0, 10.0));
        let e2 = edge((1e160, 0.0, 0.0), (1e160, 0.0, 10.0));
        assert_eq!(cdd(&e1, &e2, 1.0).unwrap(), 0.0);

        let exact = Cdds::new(CddsConfig::new(1.0).with_epsilon(0.0)).unwrap();
        assert_eq!(exact.edge_duration(&e1, &e2), 0.0);

        // Same scale, still representable
        let e3 = edge((1e150, 0.0, 0.0), (1e150, 0.0, 10.0));
        assert_eq!(cdd(&e1, &e3, 1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_cdd_coincident_at_huge_coordinates() {
        let e = edge((1e160, -1e160, 0.0), (1e160, -1e160, 10.0));
        assert_relative_eq!(cdd(&e, &e, 0.0).unwrap(), 10.0);
    }

    #[test]
    fn test_eval() {
        let d = SquaredDistance::new(1.0, -10.0, 25.0);
        assert_eq!(d.eval(5.0), 0.0);
        assert_eq!(d.eval(0.0), 25.0);
        assert_eq!(d.eval(7.0), 4.0);
    }

    // ===== cdd =====

    #[test]
    fn test_cdd_disjoint_edges() {
        let e1 = edge((0.0, 0.0, 0.0), (1.0, 0.0, 5.0));
        let e2 = edge((0.0, 0.0, 6.0), (1.0, 0.0, 9.0));
        assert_eq!(cdd(&e1, &e2, 100.0).unwrap(), 0.0);
    }

    #[test]
    fn test_cdd_touching_edges() {
        let e1 = edge((0.0, 0.0, 0.0), (1.0, 0.0, 5.0));
        let e2 = edge((1.0, 0.0, 5.0), (2.0, 0.0, 9.0));
        assert_eq!(cdd(&e1, &e2, 100.0).unwrap(), 0.0);
    }

    #[test]
    fn test_cdd_same_edge() {
        let e = edge((0.0, 0.0, 0.0), (10.0, 3.0, 10.0));
        assert_relative_eq!(cdd(&e, &e, 0.0).unwrap(), 10.0);
    }

    #[test]
    fn test_cdd_parallel_edges() {
        // 5 apart over the window [5, 10]
        let e1 = edge((0.0, 0.0, 0.0), (10.0, 0.0, 10.0));
        let e2 = edge((5.0, 5.0, 5.0), (15.0, 5.0, 15.0));

        assert_eq!(cdd(&e1, &e2, 3.0).unwrap(), 0.0);
        assert_relative_eq!(cdd(&e1, &e2, 5.0).unwrap(), 5.0);
    }

    #[test]
    fn test_cdd_crossing_edges() {
        // Both pass the origin at t = 5; d² = 2(t - 5)²
        let e1 = edge((-5.0, 0.0, 0.0), (5.0, 0.0, 10.0));
        let e2 = edge((0.0, -5.0, 0.0), (0.0, 5.0, 10.0));

        let d = cdd(&e1, &e2, 2.0_f64.sqrt()).unwrap();
        assert_relative_eq!(d, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cdd_quadratic_partial_window() {
        // x-axis at unit speed vs. diagonal from (2, 2) at t=1 to (5, 5) at t=5
        let e1 = edge((0.0, 0.0, 0.0), (10.0, 0.0, 10.0));
        let e2 = edge((2.0, 2.0, 1.0), (5.0, 5.0, 5.0));

        // t² + 2t - 9.4 ≤ 0 from t=1 to -1 + sqrt(10.4)
        let expected = -1.0 + 10.4_f64.sqrt() - 1.0;
        assert_relative_eq!(cdd(&e1, &e2, 3.0).unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_cdd_is_symmetric() {
        let e1 = edge((10.0, 0.0, 10.0), (20.0, 0.0, 20.0));
        let e2 = edge((15.0, 5.0, 15.0), (25.0, -5.0, 28.0));

        assert_eq!(cdd(&e1, &e2, 3.0).unwrap(), cdd(&e2, &e1, 3.0).unwrap());
    }

    #[test]
    fn test_cdd_collinear_resampled_motion() {
        // Same constant-velocity motion sampled at different times. Exact
        // comparisons see rounding noise here instead of identical motion.
        let e1 = edge(
            (-60.058831044987514, 57.352007531016184, 4.954350870919409),
            (-48.05718732555475, 46.207742399162704, 9.504312412327916),
        );
        let e2 = edge(
            (-52.238644336282846, 50.09048268494114, 7.919073837460023),
            (-48.05718732555475, 46.207742399162704, 9.504312412327916),
        );

        let d = cdd(&e1, &e2, 0.0).unwrap();
        assert_relative_eq!(d, 9.504312412327916 - 7.919073837460023, epsilon = 1e-9);
    }

    #[test]
    fn test_cdd_large_timestamps() {
        // Same crossing geometry shifted to Unix-second timestamps
        let t0 = 1_600_000_000.0;
        let e1 = edge((-5.0, 0.0, t0), (5.0, 0.0, t0 + 10.0));
        let e2 = edge((0.0, -5.0, t0), (0.0, 5.0, t0 + 10.0));

        let d = cdd(&e1, &e2, 2.0_f64.sqrt()).unwrap();
        assert_relative_eq!(d, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_cdd_negative_threshold_rejected() {
        let e = edge((0.0, 0.0, 0.0), (1.0, 0.0, 1.0));
        assert!(matches!(cdd(&e, &e, -1.0), Err(Error::InvalidThreshold(_))));
    }
}
