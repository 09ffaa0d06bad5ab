//! Error types for masklane operations.
//!
//! Only the orchestration layer reports errors. The lane engine and the kernels
//! built on it treat short slices and misaligned lengths as caller bugs and check
//! them with debug assertions only.

use std::fmt;

/// Errors that can occur while dispatching a render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MasklaneError {
    /// More workers were requested than the partitioner allows.
    WorkerLimitExceeded {
        /// Number of workers the caller asked for.
        requested: usize,
        /// Configured ceiling.
        max: usize,
    },
    /// The worker pool could not be started.
    ThreadPoolError {
        /// Human-readable error message.
        message: String,
    },
    /// Input validation error.
    ValidationError {
        /// Human-readable error message.
        message: String,
    },
}

impl fmt::Display for MasklaneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MasklaneError::WorkerLimitExceeded { requested, max } => write!(
                f,
                "Worker limit exceeded: requested {} workers, max allowed is {}",
                requested, max
            ),
            MasklaneError::ThreadPoolError { message } => {
                write!(f, "Worker pool failed to start: {}", message)
            }
            MasklaneError::ValidationError { message } => {
                write!(f, "Validation error: {}", message)
            }
        }
    }
}

impl std::error::Error for MasklaneError {}

/// Result type alias for masklane operations.
pub type Result<T> = std::result::Result<T, MasklaneError>;

/// Creates a worker limit error.
pub fn worker_limit_error(requested: usize, max: usize) -> MasklaneError {
    MasklaneError::WorkerLimitExceeded { requested, max }
}

/// Creates a thread pool error.
pub fn thread_pool_error(message: impl Into<String>) -> MasklaneError {
    MasklaneError::ThreadPoolError {
        message: message.into(),
    }
}

/// Creates a validation error.
pub fn validation_error(message: impl Into<String>) -> MasklaneError {
    MasklaneError::ValidationError {
        message: message.into(),
    }
}
