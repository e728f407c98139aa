//! H-hat Local Statevector Simulator
//!
//! Runs the `OpenQASM` 2 programs produced by the lowering crate and
//! returns measurement counts. The simulator is exact up to sampling noise
//! and limited by memory to roughly 20-25 qubits.
//!
//! # Supported input
//!
//! - `qreg` / `creg` declarations (several registers are flattened in order)
//! - Gates `id x y z h s sdg t tdg rx ry rz u1 u2 u3 cx cz swap ccx`
//! - `reset`, `barrier`, per-bit and broadcast `measure`
//!
//! # Example
//!
//! ```ignore
//! use hhat_adapter_sim::SimulatorBackend;
//! use hhat_hal::Backend;
//!
//! let backend = SimulatorBackend::new().with_seed(7);
//! let job_id = backend.submit(program, 1000).await?;
//! let result = backend.wait(&job_id, None).await?;
//! println!("Results: {:?}", result.counts);
//! ```

mod circuit;
mod error;
mod lexer;
mod parser;
mod simulator;
mod statevector;

pub use circuit::{Circuit, Gate, Op};
pub use error::{SimError, SimResult};
pub use parser::parse;
pub use simulator::SimulatorBackend;
