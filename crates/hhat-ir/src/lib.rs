//! H-hat Intermediate Representation
//!
//! The structured, ordered form of a type-checked H-hat program as produced
//! by the front end. Everything here is built once and read-only afterwards.
//!
//! # Core Components
//!
//! - **Literals**: [`Literal`] with the kinds `Core`, `Composite` and
//!   `CompositeMix`; [`CoreLiteral`] pairs a [`Value`] with its type.
//! - **Instructions**: [`InstrIR`] = (name, [`ArgsIR`], [`InstrFlag`]).
//! - **Blocks**: [`BlockIR`], an ordered sequence of instructions and nested
//!   blocks (closures, control flow bodies).
//! - **Tables**: [`FnTable`] for function bodies; the type table comes from
//!   `hhat-types`.
//! - **Program**: [`Ir`] bundling types, functions and the main block.
//!
//! # Example
//!
//! ```rust
//! use hhat_ir::{ArgIR, BlockFlag, BlockIR, InstrIR};
//! use hhat_types::FullName;
//!
//! let q = ArgIR::Symbol(FullName::local("@q"));
//! let block = BlockIR::builder(BlockFlag::InstrBlock)
//!     .instr(InstrIR::call("@redim", [q.clone()]))
//!     .instr(InstrIR::call("@sync", [q]))
//!     .build();
//!
//! assert_eq!(block.instructions().len(), 2);
//! ```

pub mod block;
pub mod error;
pub mod function;
pub mod instruction;
pub mod literal;
pub mod program;

pub use block::{BlockBuilder, BlockFlag, BlockIR, BlockItem};
pub use error::{IrError, IrResult};
pub use function::{FnArg, FnHeader, FnTable};
pub use instruction::{ArgIR, ArgsIR, InstrFlag, InstrIR};
pub use literal::{CoreLiteral, Literal, Value};
pub use program::Ir;
