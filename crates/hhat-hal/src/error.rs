//! Error types for the HAL crate.

use thiserror::Error;

/// Errors that can occur in HAL operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Backend is not available.
    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    /// Job execution failed.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// Job was cancelled.
    #[error("Job cancelled")]
    JobCancelled,

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Program text could not be loaded by the backend.
    #[error("Invalid program: {0}")]
    InvalidProgram(String),

    /// Program needs more qubits than the backend has.
    #[error("Program uses {required} qubits but backend '{backend}' supports {available}")]
    ProgramTooLarge {
        /// Backend name.
        backend: String,
        /// Qubits declared by the program.
        required: u32,
        /// Qubits offered by the backend.
        available: u32,
    },

    /// Backend returned an empty or malformed result.
    #[error("Invalid result: {0}")]
    InvalidResult(String),

    /// Timeout waiting for job.
    #[error("Timeout waiting for job {0}")]
    Timeout(String),

    /// Invalid number of shots.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// Generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
