//! H-hat Casts
//!
//! Turns quantum values into classical ones (and back) for the surrounding
//! evaluator. A quantum to classical cast lowers the variable's block to
//! `OpenQASM` 2, runs it on a backend, reduces the measured distribution with
//! a [`Resolver`] and shapes the outcome with the target's [`TypeSpec`].
//!
//! # Core Components
//!
//! - [`Cast`]: origin and target type, classified by paradigm
//! - [`QuantumProgram`]: lowering plus execution for one variable
//! - Resolvers: [`RawValue`], [`WeightedAverageValue`], [`HighestValue`],
//!   [`LowestValue`], selected by [`ResolverKind`]
//! - [`RuntimeConfig`]: backend, shots, timeout, resolver and memory limits
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use hhat_cast::{Cast, CastContext, CastInput, QuantumProgram, RuntimeConfig};
//! use hhat_adapter_sim::SimulatorBackend;
//!
//! let config = RuntimeConfig::load(None)?;
//! let ctx = CastContext::new(&config, Arc::new(SimulatorBackend::new()), &types);
//!
//! let program = QuantumProgram::new(&var, &block, mem.idx());
//! let out = Cast::new("@u2", "u8")
//!     .apply(CastInput::Quantum(program), &ctx)
//!     .await?;
//! ```

pub mod cast;
pub mod config;
pub mod convert;
pub mod error;
pub mod program;
pub mod resolver;
pub mod spec;

pub use cast::{Cast, CastContext, CastInput, CastOutput, DataParadigm};
pub use config::{ExecutionConfig, MemoryConfig, RuntimeConfig};
pub use error::{CastError, CastResult, ConfigError, ConfigResult};
pub use program::QuantumProgram;
pub use resolver::{
    HighestValue, LowestValue, RawValue, ResolveError, Resolved, Resolver, ResolverKind,
    WeightedAverageValue,
};
pub use spec::TypeSpec;
