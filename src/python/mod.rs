//! Python bindings for cdds-rs using PyO3.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

mod trajectory;

pub use trajectory::PyTrajectory;

use crate::{Cdds, CddsConfig, DEFAULT_EPSILON};

fn calculator(distance_threshold: f64, epsilon: f64) -> PyResult<Cdds> {
    Cdds::new(CddsConfig::new(distance_threshold).with_epsilon(epsilon))
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Close-distance duration similarity of two trajectories.
///
/// Total time during which the interpolated positions are at most
/// `distance_threshold` apart.
#[pyfunction]
#[pyo3(signature = (t1, t2, distance_threshold, epsilon=DEFAULT_EPSILON))]
pub fn cdds(
    t1: &PyTrajectory,
    t2: &PyTrajectory,
    distance_threshold: f64,
    epsilon: f64,
) -> PyResult<f64> {
    let cdds = calculator(distance_threshold, epsilon)?;
    Ok(cdds.duration(&t1.inner, &t2.inner))
}

/// Like `cdds`, also returning the sweep counters.
///
/// Returns:
///     (duration, solver_calls, overlapping_pairs)
#[pyfunction]
#[pyo3(signature = (t1, t2, distance_threshold, epsilon=DEFAULT_EPSILON))]
pub fn cdds_report(
    t1: &PyTrajectory,
    t2: &PyTrajectory,
    distance_threshold: f64,
    epsilon: f64,
) -> PyResult<(f64, usize, usize)> {
    let report = calculator(distance_threshold, epsilon)?.sweep(&t1.inner, &t2.inner);
    Ok((report.duration, report.solver_calls, report.overlapping_pairs))
}

/// Python module for cdds-rs.
#[pymodule]
fn _cdds_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTrajectory>()?;

    m.add_function(wrap_pyfunction!(cdds, m)?)?;
    m.add_function(wrap_pyfunction!(cdds_report, m)?)?;

    m.add("DEFAULT_EPSILON", DEFAULT_EPSILON)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
