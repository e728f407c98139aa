//! H-hat Low-Level Quantum Lowering
//!
//! Translates the IR block attached to one quantum variable into program
//! text for a low-level quantum language. The only target today is
//! `OpenQASM` 2.
//!
//! Instruction translation goes through a static catalog
//! ([`QInstrName`] → [`InstrHandler`]), and the register layout comes from
//! the variable's allocation in an [`IndexManager`](hhat_mem::IndexManager).
//!
//! # Example
//!
//! ```
//! use hhat_ir::{BlockIR, InstrIR};
//! use hhat_mem::IndexManager;
//! use hhat_qlang::{LowLevelQLang, NoFallback, OpenQasm2};
//! use hhat_types::FullName;
//!
//! let var = FullName::local("@v");
//! let mut idx = IndexManager::new(5);
//! idx.request(&var, 1).unwrap();
//!
//! let block = BlockIR::from_instrs([InstrIR::call("@redim", [])]);
//! let program = OpenQasm2::new(var, &idx, &NoFallback)
//!     .unwrap()
//!     .gen_program(&block)
//!     .unwrap();
//! assert!(program.ends_with("h q[0];\nmeasure q -> c;\n"));
//! ```

pub mod error;
pub mod fallback;
pub mod openqasm2;
pub mod qlang;
pub mod status;

pub use error::{QLangError, QLangResult};
pub use fallback::{ClassicalEvaluator, NoFallback, StaticScope};
pub use openqasm2::{InstrArgs, InstrHandler, OpenQasm2, QInstrName};
pub use qlang::LowLevelQLang;
pub use status::InstrStatus;
