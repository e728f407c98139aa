//! H-hat Type System
//!
//! Identity, sizing and data type declarations for the H-hat core.
//!
//! # Core Components
//!
//! - **Names**: [`NameSpace`] and [`FullName`], the hashable keys used by every
//!   table in the core. A leading `@` marks a name as quantum.
//! - **Sizes**: [`Size`] (classical bit width, write-once) and [`QSize`]
//!   (minimum/maximum quantum index count).
//! - **Data types**: [`DataType`] in one of four kinds ([`DataTypeKind`]):
//!   single, struct, union and enum.
//! - **Type table**: [`TypeTable`], with cycle detection and memoized
//!   recursive size resolution.
//!
//! # Example
//!
//! ```rust
//! use hhat_types::{DataType, DataTypeKind, FullName, Member, QSize, TypeTable};
//!
//! let mut table = TypeTable::with_builtins();
//! let pair = DataType::new("@pair", DataTypeKind::Struct)
//!     .with_member(Member::typed("@a", "@bool"))?
//!     .with_member(Member::typed("@b", "@bool"))?;
//! table.add(pair)?;
//!
//! let qsize = table.resolve_qsize(&FullName::local("@pair"))?;
//! assert_eq!(qsize, QSize::fixed(2));
//! # Ok::<(), hhat_types::TypeError>(())
//! ```
//!
//! # Paradigm rules
//!
//! Quantum members may be embedded only in quantum containers. Classical
//! members may appear anywhere. Struct member names carry the same sigil as
//! their type.

pub mod builtin;
pub mod datatype;
pub mod error;
pub mod name;
pub mod resolve;
pub mod size;
pub mod table;

pub use datatype::{DataType, DataTypeKind, Member, MemberKind};
pub use error::{TypeError, TypeResult};
pub use name::{FullName, NameSpace, QUANTUM_SIGIL, is_quantum_name};
pub use resolve::{resolve_qsize, resolve_size};
pub use size::{QSize, Size};
pub use table::TypeTable;
