//! Engine error types.

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open the database file.
    #[error("Failed to open database {path}: {message}")]
    OpenFailed { path: PathBuf, message: String },

    /// Failed to execute a SQL statement.
    #[error("Execution failed: {message}")]
    ExecutionFailed { message: String },

    /// The statement did not finish within the wall-clock bound.
    #[error("Query exceeded the {}s time limit", .limit.as_secs_f64())]
    TimedOut { limit: Duration },

    /// Generic engine error.
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl EngineError {
    /// Create an open failed error.
    pub fn open_failed(path: &Path, message: impl Into<String>) -> Self {
        Self::OpenFailed {
            path: path.to_owned(),
            message: message.into(),
        }
    }

    /// Create an execution failed error.
    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            message: message.into(),
        }
    }

    /// Create a timed out error.
    pub fn timed_out(limit: Duration) -> Self {
        Self::TimedOut { limit }
    }

    /// Whether this error is the time-limit sentinel.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}
