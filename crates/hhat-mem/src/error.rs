//! Error types for memory management.

use thiserror::Error;

use hhat_types::{FullName, TypeError};

/// Errors raised by the index manager, stack, heap and variables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MemError {
    /// Not enough free indices. Nothing was allocated.
    #[error("Variable '{var}' requested {requested} indexes, but only {available} are available")]
    IndexAllocation {
        /// Requesting variable.
        var: FullName,
        /// Number of indices requested.
        requested: usize,
        /// Number of free indices at the time of the request.
        available: usize,
    },

    /// The variable already holds indices.
    #[error("Variable '{0}' already has indexes")]
    IndexVarHasIndexes(FullName),

    /// The variable holds no indices (or has no reservation).
    #[error("Variable '{0}' holds no indexes")]
    IndexInvalidVar(FullName),

    /// A request for zero indices.
    #[error("Variable '{0}' requested zero indexes")]
    IndexEmptyRequest(FullName),

    /// Push onto a full stack.
    #[error("Stack overflow (capacity {capacity})")]
    StackOverflow {
        /// Maximum number of stack entries.
        capacity: usize,
    },

    /// Pop or peek on an empty stack.
    #[error("Stack is empty")]
    StackEmpty,

    /// Heap lookup for a name that was never stored.
    #[error("Invalid heap key '{0}'")]
    HeapInvalidKey(FullName),

    /// Heap lookup for a variable that was already freed.
    #[error("Variable '{0}' used after free")]
    UseAfterFree(FullName),

    /// Variable cannot be created with the given type.
    #[error("Cannot create variable '{var}' of type '{type_name}': {reason}")]
    VariableCreation {
        /// Variable name.
        var: FullName,
        /// Declared type.
        type_name: FullName,
        /// Why creation failed.
        reason: String,
    },

    /// Reassignment of a variable that does not allow it.
    #[error("Variable '{0}' is immutable")]
    VariableImmutable(FullName),

    /// Member lookup on a variable that has no such member.
    #[error("Variable '{var}' has no member '{member}'")]
    VariableWrongMember {
        /// Variable name.
        var: FullName,
        /// Requested member.
        member: String,
    },

    /// Type error while assigning or resolving.
    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Result type for memory operations.
pub type MemResult<T> = Result<T, MemError>;
