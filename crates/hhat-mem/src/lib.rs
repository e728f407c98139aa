//! H-hat Memory
//!
//! Runtime memory for one program scope:
//!
//! - [`IndexManager`]: the bounded pool of quantum indices ("qubit slots")
//!   granted to quantum variables.
//! - [`Stack`]: bounded LIFO for intermediate literal values.
//! - [`Heap`]: named variable storage with use-after-free detection.
//! - [`Variable`]: typed containers laid out after their data type.
//! - [`MemoryManager`]: owns all three and couples variable lifetime to index
//!   lifetime.
//!
//! None of these types synchronize internally. A host that runs several
//! programs in parallel holds one [`MemoryManager`] per program.
//!
//! # Example
//!
//! ```rust
//! use hhat_mem::IndexManager;
//! use hhat_types::FullName;
//!
//! let mut idx = IndexManager::new(4);
//! let q = FullName::local("@q");
//!
//! assert_eq!(idx.request(&q, 3)?, vec![0, 1, 2]);
//! assert!(idx.request(&FullName::local("@r"), 2).is_err());
//! assert_eq!(idx.free(&q)?, vec![0, 1, 2]);
//! assert_eq!(idx.num_available(), 4);
//! # Ok::<(), hhat_mem::MemError>(())
//! ```

pub mod error;
pub mod heap;
pub mod index;
pub mod manager;
pub mod stack;
pub mod variable;

pub use error::{MemError, MemResult};
pub use heap::Heap;
pub use index::IndexManager;
pub use manager::{DEFAULT_STACK_CAPACITY, MemoryManager};
pub use stack::Stack;
pub use variable::{Variable, VariableKind};
