//! Error types for the IR crate.

use thiserror::Error;

use hhat_types::{FullName, TypeError};

/// Errors that can occur while assembling IR tables.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A function with the same header already exists.
    #[error("Function '{0}' is already defined")]
    FunctionAlreadyDefined(String),

    /// A function signature refers to a type missing from the type table.
    #[error("Function '{function}' refers to unknown type '{type_name}'")]
    UnknownFnType {
        /// Function name.
        function: FullName,
        /// The missing type.
        type_name: FullName,
    },

    /// Type table error.
    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
