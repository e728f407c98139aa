//! Error types for the type system.

use thiserror::Error;

use crate::datatype::{DataTypeKind, MemberKind};
use crate::name::FullName;

/// Errors raised while declaring, populating or resolving data types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TypeError {
    /// Type is not present in the type table.
    #[error("Unknown type '{0}'")]
    UnknownType(FullName),

    /// A type with the same full name was already registered.
    #[error("Type '{0}' is already defined")]
    TypeAlreadyDefined(FullName),

    /// A classical container tried to hold a quantum member.
    #[error("Classical type '{container}' cannot hold quantum member type '{member_type}'")]
    QuantumOnClassical {
        /// The classical container.
        container: FullName,
        /// The quantum member type.
        member_type: FullName,
    },

    /// A struct member name and its type disagree on paradigm.
    #[error(
        "Member '{member}' of '{container}' and its type '{member_type}' belong to different paradigms"
    )]
    MemberParadigmMismatch {
        /// The struct type.
        container: FullName,
        /// The member name.
        member: String,
        /// The member type.
        member_type: FullName,
    },

    /// Member does not match the container's supported member kind.
    #[error("Type '{container}' accepts {expected} members, got {found}")]
    MemberKindMismatch {
        /// The container type.
        container: FullName,
        /// Member kind accepted by the container.
        expected: MemberKind,
        /// Member kind that was supplied.
        found: MemberKind,
    },

    /// Member name (or enum tag) already present in the container.
    #[error("Duplicate member '{member}' in type '{container}'")]
    DuplicateMember {
        /// The container type.
        container: FullName,
        /// The duplicated member name.
        member: String,
    },

    /// A single type already holds its only member.
    #[error("Single type '{0}' already has a member")]
    SingleAlreadyAssigned(FullName),

    /// Value assignment does not fit the container layout.
    #[error("{kind} assignment mismatch on '{type_name}': {reason}")]
    AssignMismatch {
        /// Kind of the target container.
        kind: DataTypeKind,
        /// The target type.
        type_name: FullName,
        /// What did not fit.
        reason: String,
    },

    /// `Size::add_size` was called on an already sized value.
    #[error("Size already set to {current} bits, cannot set {requested}")]
    SizeAlreadySet {
        /// Size recorded by the first call.
        current: u32,
        /// Size supplied by the rejected call.
        requested: u32,
    },

    /// Type definitions form a cycle.
    #[error("Type definition cycle: {}", format_path(.path))]
    DefinitionCycle {
        /// The offending path, starting and ending on the same type.
        path: Vec<FullName>,
    },

    /// Classical size requested for a type without a fixed width.
    #[error("Type '{0}' has no fixed size")]
    UnsizedType(FullName),

    /// Enum payloads must be single or struct types.
    #[error("Enum '{enum_name}' variant '{tag}' carries invalid payload type '{payload}'")]
    InvalidEnumPayload {
        /// The enum type.
        enum_name: FullName,
        /// The variant tag.
        tag: String,
        /// The rejected payload type.
        payload: FullName,
    },

    /// Builtin types cannot be modified after registration.
    #[error("Builtin type '{0}' is immutable")]
    BuiltinImmutable(FullName),
}

fn format_path(path: &[FullName]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Result type for type system operations.
pub type TypeResult<T> = Result<T, TypeError>;
