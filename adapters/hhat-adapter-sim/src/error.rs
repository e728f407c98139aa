//! Error types for the simulator adapter.

use hhat_hal::HalError;
use thiserror::Error;

/// Errors raised while loading a program into the simulator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    #[error("Lexer error at position {position}: {message}")]
    LexerError { position: usize, message: String },

    #[error("Unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of input: {0}")]
    UnexpectedEof(String),

    #[error("Unsupported OPENQASM version: {0}")]
    InvalidVersion(String),

    #[error("Undefined register: {0}")]
    UndefinedRegister(String),

    #[error("Duplicate register: {0}")]
    DuplicateRegister(String),

    #[error("Unknown gate: {0}")]
    UnknownGate(String),

    #[error("Gate '{gate}' expects {expected} qubits, got {got}")]
    WrongQubitCount {
        gate: String,
        expected: usize,
        got: usize,
    },

    #[error("Gate '{gate}' expects {expected} parameters, got {got}")]
    WrongParameterCount {
        gate: String,
        expected: usize,
        got: usize,
    },

    #[error("Index {index} out of bounds for register '{register}' of size {size}")]
    IndexOutOfBounds {
        register: String,
        index: usize,
        size: usize,
    },

    /// Broadcast arguments name registers of different sizes.
    #[error("Register size mismatch in '{0}'")]
    RegisterSizeMismatch(String),

    /// The same qubit appears twice in one gate application.
    #[error("Gate '{0}' applied to a repeated qubit")]
    RepeatedQubit(String),
}

/// Result type for simulator operations.
pub type SimResult<T> = Result<T, SimError>;

impl From<SimError> for HalError {
    fn from(err: SimError) -> Self {
        HalError::InvalidProgram(err.to_string())
    }
}
