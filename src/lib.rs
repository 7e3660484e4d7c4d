//! # cdds-rs - Close-Distance Duration Similarity
//!
//! Measures how long two moving objects stay close to each other.
//!
//! A trajectory is an ordered list of timestamped 2D samples. Between samples
//! an object is assumed to move in a straight line at constant speed. Given a
//! distance threshold, CDDS is the total time during which the two interpolated
//! positions are at most that far apart. It is the similarity primitive used by
//! spatio-temporal trajectory joins that rank pairs by proximity duration.
//!
//! ## Features
//!
//! - Validated trajectory model with edge (segment) views
//! - Closed-form per-edge solver (CDD) over a quadratic squared-distance
//! - Linear merge sweep over both trajectories (CDDS)
//! - Text record parsing and rendering
//! - Optional Python bindings (`python` feature)
//!
//! ## Example
//!
//! ```rust
//! use cdds_rs::{cdds, Trajectory};
//!
//! let t1: Trajectory = "4 0 0 0 10 0 10 20 0 20 30 0 30".parse().unwrap();
//! let t2: Trajectory = "5 2 2 1 5 5 5 15 5 15 25 -5 28 35 5 35".parse().unwrap();
//!
//! let duration = cdds(&t1, &t2, 3.0).unwrap();
//! assert!((duration - 7.7835).abs() < 1e-3);
//! ```

// Public modules
pub mod sample;
pub mod trajectory;
pub mod motion;
pub mod solver;
pub mod aggregate;
pub mod config;
pub mod io;

// Optional modules
#[cfg(feature = "python")]
pub mod python;

// Re-exports for convenience
pub use sample::Sample;
pub use trajectory::{Edge, Trajectory};
pub use motion::{derive_motion, EdgeMotion};
pub use solver::{cdd, SquaredDistance};
pub use aggregate::{cdds, Cdds, SweepReport};
pub use config::{CddsConfig, DEFAULT_EPSILON};
pub use io::TrajectoryFileParser;

// Error types
pub use crate::error::{Error, Result};

mod error {
    use thiserror::Error;

    /// Errors that can occur in the cdds library
    #[derive(Error, Debug)]
    pub enum Error {
        #[error("invalid edge: zero time span (t = {start} and t = {end})")]
        ZeroTimeSpan { start: f64, end: f64 },

        #[error("non-increasing timestamp at sample {index}: {current} follows {previous}")]
        NonIncreasingTimestamp {
            index: usize,
            previous: f64,
            current: f64,
        },

        #[error("non-finite coordinate or timestamp at sample {index}")]
        NonFiniteSample { index: usize },

        #[error("trajectory must contain at least one sample")]
        EmptyTrajectory,

        #[error("invalid distance threshold: {0} (must be finite and non-negative)")]
        InvalidThreshold(f64),

        #[error("Invalid configuration: {0}")]
        InvalidConfig(String),

        #[error("Parse error: {0}")]
        Parse(String),

        #[error("IO error: {0}")]
        IoError(#[from] std::io::Error),
    }

    /// Result type for cdds operations
    pub type Result<T> = std::result::Result<T, Error>;
}
