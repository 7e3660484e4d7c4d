//! Trajectory aggregator (CDDS).

use tracing::{debug, trace};

use crate::config::CddsConfig;
use crate::solver::close_distance_duration;
use crate::{Edge, Result, Trajectory};

/// Outcome of one CDDS sweep.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SweepReport {
    /// Total close-distance duration.
    pub duration: f64,
    /// Number of edge pairs handed to the solver.
    pub solver_calls: usize,
    /// Edge pairs whose time windows overlap with positive length.
    pub overlapping_pairs: usize,
}

/// CDD / CDDS calculator bound to a validated configuration.
///
/// Holds no mutable state; a single instance can be shared across threads
/// and used for any number of trajectory pairs.
#[derive(Debug, Clone, Copy)]
pub struct Cdds {
    config: CddsConfig,
    threshold_sq: f64,
}

impl Cdds {
    /// Create a calculator from a configuration.
    ///
    /// # Errors
    /// `InvalidThreshold` or `InvalidConfig` if the configuration is invalid.
    pub fn new(config: CddsConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            threshold_sq: config.distance_threshold * config.distance_threshold,
        })
    }

    /// Create a calculator with the default tolerance.
    pub fn with_threshold(distance_threshold: f64) -> Result<Self> {
        Self::new(CddsConfig::new(distance_threshold))
    }

    /// The validated configuration.
    pub fn config(&self) -> &CddsConfig {
        &self.config
    }

    /// Close-distance duration of a single edge pair (CDD).
    #[inline]
    pub fn edge_duration(&self, e1: &Edge, e2: &Edge) -> f64 {
        close_distance_duration(e1, e2, self.threshold_sq, self.config.epsilon)
    }

    /// Close-distance duration of two trajectories (CDDS).
    pub fn duration(&self, t1: &Trajectory, t2: &Trajectory) -> f64 {
        self.sweep(t1, t2).duration
    }

    /// Sweep both trajectories' edges in time order and sum per-pair CDDs.
    ///
    /// Merge-style: after each pair the edge that ends first is advanced
    /// (both on a tie), so at most `num_edges(t1) + num_edges(t2) - 1` pairs
    /// are solved.
    pub fn sweep(&self, t1: &Trajectory, t2: &Trajectory) -> SweepReport {
        let mut report = SweepReport::default();

        let n1 = t1.num_edges();
        let n2 = t2.num_edges();
        let (mut i, mut j) = (0, 0);

        while let (Some(e1), Some(e2)) = (t1.edge(i), t2.edge(j)) {
            let d = self.edge_duration(&e1, &e2);
            report.solver_calls += 1;
            if e1.overlaps(&e2) {
                report.overlapping_pairs += 1;
            }
            if d > 0.0 {
                trace!(i, j, duration = d, "close edge pair");
            }
            report.duration += d;

            let (end1, end2) = (e1.end().t, e2.end().t);
            if end1 < end2 {
                i += 1;
            } else if end2 < end1 {
                j += 1;
            } else {
                i += 1;
                j += 1;
            }
        }

        debug!(
            edges1 = n1,
            edges2 = n2,
            solver_calls = report.solver_calls,
            overlapping_pairs = report.overlapping_pairs,
            duration = report.duration,
            "cdds sweep finished"
        );

        report
    }
}

/// Close-distance duration similarity (CDDS) of two trajectories.
///
/// Total time during which the linearly interpolated positions of `t1` and
/// `t2` are at most `threshold` apart. The result lies in
/// `[0, min(t1.span(), t2.span())]` and shares the unit of the timestamps.
///
/// # Errors
/// `InvalidThreshold` if `threshold` is negative or not finite.
pub fn cdds(t1: &Trajectory, t2: &Trajectory, threshold: f64) -> Result<f64> {
    Ok(Cdds::with_threshold(threshold)?.duration(t1, t2))
}
