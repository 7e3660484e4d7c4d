//! Timestamped 2D sample.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// A recorded position of a moving object.
///
/// Coordinates are planar; `t` is in whatever unit the caller uses for time
/// (seconds, frames, ...). Durations returned by the solver share that unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    pub t: f64,
}

impl Sample {
    /// Create a new sample.
    pub fn new(x: f64, y: f64, t: f64) -> Self {
        Self { x, y, t }
    }

    /// Planar position of this sample.
    #[inline]
    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    /// True if both coordinates and the timestamp are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.t.is_finite()
    }
}

impl From<(f64, f64, f64)> for Sample {
    fn from((x, y, t): (f64, f64, f64)) -> Self {
        Self::new(x, y, t)
    }
}
