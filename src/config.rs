//! CDDS configuration.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default relative tolerance for classifying squared-distance coefficients.
///
/// Expressed in distance units: a term of the squared-distance polynomial is
/// treated as zero when its largest contribution over the overlap window is
/// at most `(epsilon * reference)^2`, where `reference` is the largest
/// length involved (coordinates of the edge endpoints inside the window, the
/// threshold, and the terms themselves). See [`SquaredDistance`] for the exact
/// rule. `0.0` restores exact comparisons.
///
/// [`SquaredDistance`]: crate::SquaredDistance
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Configuration for CDD / CDDS computations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CddsConfig {
    /// Maximum distance at which two objects count as close.
    pub distance_threshold: f64,

    /// Relative tolerance for the solver's case analysis.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

impl CddsConfig {
    /// Create a configuration with the default tolerance.
    ///
    /// # Arguments
    /// * `distance_threshold` - Closeness threshold, in coordinate units
    pub fn new(distance_threshold: f64) -> Self {
        Self {
            distance_threshold,
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Replace the solver tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Check that the threshold is finite and non-negative and the tolerance
    /// lies in `[0, 1)`.
    pub fn validate(&self) -> Result<()> {
        if !self.distance_threshold.is_finite() || self.distance_threshold < 0.0 {
            return Err(Error::InvalidThreshold(self.distance_threshold));
        }

        if !(0.0..1.0).contains(&self.epsilon) {
            return Err(Error::InvalidConfig(format!(
                "epsilon must be in [0, 1), got {}",
                self.epsilon
            )));
        }

        Ok(())
    }
}
