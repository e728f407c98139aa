//! Error types for low-level lowering.

use thiserror::Error;

use hhat_ir::BlockFlag;
use hhat_mem::MemError;
use hhat_types::FullName;

use crate::status::InstrStatus;

/// Errors raised while lowering IR to a low-level quantum language.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum QLangError {
    /// The quantum instruction has no entry in the target's catalog.
    #[error("Instruction '{0}' not found in the target instruction catalog")]
    InstrNotFound(String),

    /// A catalog handler finished in a status other than `DONE`.
    #[error("Instruction '{instr}' finished with status {status}")]
    InstrStatus { instr: String, status: InstrStatus },

    /// A symbol argument could not be resolved.
    #[error("Unknown symbol '{0}' in quantum instruction arguments")]
    UnknownSymbol(FullName),

    /// A quantum literal needs more slots than the variable holds.
    #[error("Literal {literal} does not fit in {slots} slot(s)")]
    LiteralOverflow { literal: String, slots: usize },

    /// An argument kind the target cannot express.
    #[error("Unsupported argument '{arg}' for instruction '{instr}'")]
    UnsupportedArg { instr: String, arg: String },

    /// The classical evaluator refused an instruction.
    #[error("Classical fallback failed for '{instr}': {reason}")]
    Fallback { instr: String, reason: String },

    /// A nested block that cannot be lowered to straight-line code.
    #[error("Cannot lower a {0:?} block")]
    UnsupportedBlock(BlockFlag),

    #[error(transparent)]
    Mem(#[from] MemError),
}

/// Result type for lowering.
pub type QLangResult<T> = Result<T, QLangError>;
