//! Python wrapper for Trajectory.

use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::{Sample, Trajectory};

/// An ordered sequence of timestamped 2D samples.
///
/// Timestamps must be strictly increasing. Positions are linearly
/// interpolated between samples.
#[pyclass(name = "Trajectory", frozen)]
#[derive(Clone)]
pub struct PyTrajectory {
    pub(crate) inner: Trajectory,
}

impl PyTrajectory {
    /// Wrap a Rust Trajectory.
    pub fn from_trajectory(traj: Trajectory) -> Self {
        Self { inner: traj }
    }
}

#[pymethods]
impl PyTrajectory {
    /// Create a new Trajectory.
    ///
    /// Args:
    ///     samples: numpy array of shape (n_samples, 3) with rows [x, y, t].
    #[new]
    fn new(samples: PyReadonlyArray2<f64>) -> PyResult<Self> {
        let arr = samples.as_array();
        if arr.ncols() != 3 {
            return Err(PyValueError::new_err(format!(
                "samples must have shape (n, 3) with rows [x, y, t], got {} columns",
                arr.ncols()
            )));
        }

        let samples: Vec<Sample> = arr
            .rows()
            .into_iter()
            .map(|row| Sample::new(row[0], row[1], row[2]))
            .collect();

        Trajectory::new(samples)
            .map(Self::from_trajectory)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Parse a record of the form "N x1 y1 t1 ... xN yN tN".
    #[staticmethod]
    fn parse(record: &str) -> PyResult<Self> {
        record
            .parse::<Trajectory>()
            .map(Self::from_trajectory)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// The samples as a numpy array of shape (n_samples, 3).
    #[getter]
    fn samples<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        samples_to_numpy(py, self.inner.samples())
    }

    /// Number of edges (len - 1).
    #[getter]
    fn num_edges(&self) -> usize {
        self.inner.num_edges()
    }

    /// Time between the first and last sample.
    #[getter]
    fn span(&self) -> f64 {
        self.inner.span()
    }

    /// The record form, parseable by `Trajectory.parse`.
    fn to_record(&self) -> String {
        self.inner.to_record()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }

    fn __repr__(&self) -> String {
        format!("Trajectory({})", self.inner)
    }
}

/// Helper to convert samples to a numpy array of rows [x, y, t]
pub fn samples_to_numpy<'py>(py: Python<'py>, samples: &[Sample]) -> Bound<'py, PyArray2<f64>> {
    let mut arr = Array2::zeros((samples.len(), 3));
    for (i, s) in samples.iter().enumerate() {
        arr[[i, 0]] = s.x;
        arr[[i, 1]] = s.y;
        arr[[i, 2]] = s.t;
    }
    arr.into_pyarray_bound(py)
}
