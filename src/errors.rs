// /src/errors.rs
//! Error type shared by the diff engine, list models and the Python bridge
#[cfg(feature = "python")]
use pyo3::{exceptions::PyValueError, PyErr};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcilerError {
    #[error("Invalid argument: {details}")]
    InvalidArgument { details: String },

    #[error("Index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Edit script aborted at operation {step}: {source}")]
    ApplyFailed {
        step: usize,
        #[source]
        source: Box<ReconcilerError>,
    },

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[cfg(feature = "python")]
    #[error("Python call failed: {0}")]
    PythonError(String),
}

impl ReconcilerError {
    pub(crate) fn invalid(details: impl Into<String>) -> Self {
        ReconcilerError::InvalidArgument { details: details.into() }
    }
}

#[cfg(feature = "python")]
impl From<ReconcilerError> for PyErr {
    fn from(err: ReconcilerError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<PyErr> for ReconcilerError {
    fn from(err: PyErr) -> Self {
        ReconcilerError::PythonError(err.to_string())
    }
}
