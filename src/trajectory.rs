//! Trajectory and edge views.

use std::fmt;

use crate::{Error, Result, Sample};

/// A segment between two consecutive samples of a trajectory.
///
/// Represents constant-velocity motion from `start` to `end`. Holds copies of
/// the two samples, so it is cheap to pass around and never borrows the
/// trajectory it came from. Always satisfies `start.t < end.t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    start: Sample,
    end: Sample,
}

impl Edge {
    /// Create an edge between two samples.
    ///
    /// # Errors
    /// `ZeroTimeSpan` if both samples share a timestamp,
    /// `NonIncreasingTimestamp` if `end` precedes `start`,
    /// `NonFiniteSample` if either sample has a NaN or infinite component.
    pub fn new(start: Sample, end: Sample) -> Result<Self> {
        if !start.is_finite() {
            return Err(Error::NonFiniteSample { index: 0 });
        }
        if !end.is_finite() {
            return Err(Error::NonFiniteSample { index: 1 });
        }
        check_time_order(1, &start, &end)?;
        Ok(Self { start, end })
    }

    /// Build an edge from samples already known to be ordered and finite.
    #[inline]
    pub(crate) fn new_unchecked(start: Sample, end: Sample) -> Self {
        debug_assert!(start.t < end.t);
        Self { start, end }
    }

    #[inline]
    pub fn start(&self) -> &Sample {
        &self.start
    }

    #[inline]
    pub fn end(&self) -> &Sample {
        &self.end
    }

    /// Length of the edge in time. Always positive.
    #[inline]
    pub fn duration(&self) -> f64 {
        self.end.t - self.start.t
    }

    /// True if the open time spans of the two edges intersect.
    ///
    /// Edges that only touch at an endpoint do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Edge) -> bool {
        !(self.end.t <= other.start.t || other.end.t <= self.start.t)
    }

    /// Common time window `(lo, hi)` of two edges, if they overlap.
    #[inline]
    pub fn time_window(&self, other: &Edge) -> Option<(f64, f64)> {
        if self.overlaps(other) {
            Some((
                self.start.t.max(other.start.t),
                self.end.t.min(other.end.t),
            ))
        } else {
            None
        }
    }
}

/// An ordered sequence of timestamped samples with strictly increasing time.
///
/// Construction validates the invariants, so every edge handed out by a
/// trajectory has a positive time span.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    samples: Vec<Sample>,
}

impl Trajectory {
    /// Create a trajectory from samples in time order.
    ///
    /// # Errors
    /// - `EmptyTrajectory` if `samples` is empty
    /// - `NonFiniteSample` if any coordinate or timestamp is NaN or infinite
    /// - `ZeroTimeSpan` / `NonIncreasingTimestamp` if timestamps are not
    ///   strictly increasing
    pub fn new(samples: Vec<Sample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::EmptyTrajectory);
        }

        for (index, sample) in samples.iter().enumerate() {
            if !sample.is_finite() {
                return Err(Error::NonFiniteSample { index });
            }
        }

        for (i, pair) in samples.windows(2).enumerate() {
            check_time_order(i + 1, &pair[0], &pair[1])?;
        }

        Ok(Self { samples })
    }

    /// Create a trajectory from `(x, y, t)` triples.
    pub fn from_triples(triples: &[(f64, f64, f64)]) -> Result<Self> {
        Self::new(triples.iter().copied().map(Sample::from).collect())
    }

    /// Create a trajectory from a flat slice `[x1, y1, t1, x2, y2, t2, ...]`.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        if values.len() % 3 != 0 {
            return Err(Error::Parse(format!(
                "flat sample slice length {} is not a multiple of 3",
                values.len()
            )));
        }

        let samples = values
            .chunks_exact(3)
            .map(|c| Sample::new(c[0], c[1], c[2]))
            .collect();
        Self::new(samples)
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed trajectory; provided for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of edges (`len - 1`, or 0 for a single sample).
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.samples.len().saturating_sub(1)
    }

    /// Edge between samples `i` and `i + 1`.
    #[inline]
    pub fn edge(&self, i: usize) -> Option<Edge> {
        if i < self.num_edges() {
            Some(Edge::new_unchecked(self.samples[i], self.samples[i + 1]))
        } else {
            None
        }
    }

    /// Iterate over edges in time order.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = Edge> + '_ {
        self.samples
            .windows(2)
            .map(|w| Edge::new_unchecked(w[0], w[1]))
    }

    /// Time between the first and last sample.
    pub fn span(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => last.t - first.t,
            _ => 0.0,
        }
    }

    /// Render in the textual record format `N x1 y1 t1 ... xN yN tN`.
    ///
    /// The output parses back with [`str::parse`].
    pub fn to_record(&self) -> String {
        let mut out = self.samples.len().to_string();
        for s in &self.samples {
            out.push_str(&format!(" {} {} {}", s.x, s.y, s.t));
        }
        out
    }
}

impl fmt::Display for Trajectory {
    /// Diagnostic rendering: `N (x1, y1, t1) (x2, y2, t2) ...`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.samples.len())?;
        for s in &self.samples {
            write!(f, " ({}, {}, {})", s.x, s.y, s.t)?;
        }
        Ok(())
    }
}

/// Check that `next` strictly follows `prev` in time.
fn check_time_order(index: usize, prev: &Sample, next: &Sample) -> Result<()> {
    if next.t == prev.t {
        return Err(Error::ZeroTimeSpan {
            start: prev.t,
            end: next.t,
        });
    }
    if next.t < prev.t {
        return Err(Error::NonIncreasingTimestamp {
            index,
            previous: prev.t,
            current: next.t,
        });
    }
    Ok(())
}
