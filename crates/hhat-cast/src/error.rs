//! Error types for casts and runtime configuration.

use std::path::PathBuf;

use thiserror::Error;

use hhat_hal::HalError;
use hhat_mem::MemError;
use hhat_qlang::{InstrStatus, QLangError};
use hhat_types::{FullName, TypeError};

/// Errors raised while casting a value.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CastError {
    /// A negative value was cast to an unsigned type.
    #[error("Cannot cast negative value {value} to unsigned type '{target}'")]
    NegToUnsigned {
        /// The rejected value.
        value: i64,
        /// Target type.
        target: FullName,
    },

    /// The value does not fit the target type.
    #[error("Value {value} overflows '{target}' (maximum {max})")]
    IntOverflow {
        /// The rejected value.
        value: String,
        /// Target type.
        target: FullName,
        /// Largest value the target holds.
        max: u64,
    },

    /// No conversion exists between the two types.
    #[error("Cannot cast {value} to '{target}': {reason}")]
    UnsupportedConversion {
        /// The value (or origin type) being cast.
        value: String,
        /// Target type.
        target: FullName,
        /// What is missing.
        reason: String,
    },

    /// The variable holds a different number of indices than the origin
    /// type spans.
    #[error("'{variable}' holds {held} indexes but '{origin}' spans {expected}")]
    WidthMismatch {
        /// Quantum variable being cast.
        variable: FullName,
        /// Origin type of the cast.
        origin: FullName,
        /// Index count the origin type requires.
        expected: String,
        /// Index count allocated to the variable.
        held: usize,
    },

    /// The backend returned an empty or malformed distribution.
    #[error("Invalid quantum computed result for '{variable}': {reason}")]
    InvalidQuantumComputedResult {
        /// Quantum variable whose program was executed.
        variable: FullName,
        /// What was wrong with the result.
        reason: String,
    },

    /// Execution stopped before a result was available.
    #[error("Execution of '{variable}' ended with status {status}: {source}")]
    Execution {
        /// Quantum variable whose program was executed.
        variable: FullName,
        /// `TIMEOUT` or `INTERRUPTED`.
        status: InstrStatus,
        /// Backend error behind the status.
        source: HalError,
    },

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Mem(#[from] MemError),

    #[error(transparent)]
    QLang(#[from] QLangError),

    #[error(transparent)]
    Hal(#[from] HalError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CastError {
    /// Attach `variable` to a backend error, keeping the lowering status it
    /// maps to.
    pub(crate) fn from_execution(variable: &FullName, err: HalError) -> Self {
        match err {
            HalError::Timeout(_) => CastError::Execution {
                variable: variable.clone(),
                status: InstrStatus::Timeout,
                source: err,
            },
            HalError::JobCancelled => CastError::Execution {
                variable: variable.clone(),
                status: InstrStatus::Interrupted,
                source: err,
            },
            HalError::InvalidResult(reason) => CastError::InvalidQuantumComputedResult {
                variable: variable.clone(),
                reason,
            },
            other => CastError::Hal(other),
        }
    }
}

/// Result type for cast operations.
pub type CastResult<T> = Result<T, CastError>;

/// Errors raised while loading or validating a [`RuntimeConfig`].
///
/// [`RuntimeConfig`]: crate::RuntimeConfig
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension is neither YAML nor JSON.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(PathBuf),

    /// An environment override could not be parsed.
    #[error("Invalid value '{value}' for {var}")]
    InvalidEnv { var: String, value: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
