//! Error types for argument validation and the search pipeline.

use std::fmt;

/// Main error type for primetally operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Upper bound argument that is not a usable non-negative integer.
    InvalidArgument { value: String, reason: String },
    /// Partitioner asked to split a range across zero workers.
    ZeroWorkers,
    /// A worker thread panicked before finishing its interval.
    WorkerPanicked { worker: usize },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::InvalidArgument { value, reason } => {
                write!(f, "invalid upper bound \"{}\": {}", value, reason)
            }
            SearchError::ZeroWorkers => {
                write!(f, "cannot partition a range across zero workers")
            }
            SearchError::WorkerPanicked { worker } => {
                write!(f, "worker {} panicked before finishing its interval", worker)
            }
        }
    }
}

impl std::error::Error for SearchError {}
