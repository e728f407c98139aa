//! H-hat Hardware Abstraction Layer
//!
//! This crate is the boundary between the compiler and whatever actually runs
//! a lowered program: a local simulator, an emulator or a QPU service.
//!
//! # Overview
//!
//! - A common [`Backend`] trait for submission, polling and cancellation
//! - [`BackendInfo`] describing a target's paradigms and qubit budget
//! - [`execute`] returning an [`ExecutionHandle`] that can be waited on with
//!   a timeout or cancelled
//! - Measurement [`Counts`] validated against the requested shots
//! - Pluggable shot estimation through [`ShotsEstimator`]
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use hhat_hal::{execute, Backend, LinearShotsEstimator, ShotsEstimator};
//! use hhat_adapter_sim::SimulatorBackend;
//!
//! let backend: Arc<dyn Backend> = Arc::new(SimulatorBackend::new());
//! let shots = LinearShotsEstimator::default().estimate(2);
//! let handle = execute(backend, program, shots).await?;
//! let result = handle.wait(Some(Duration::from_secs(30))).await?;
//!
//! if let Some((bitstring, count)) = result.counts.most_frequent() {
//!     println!("{bitstring}: {count}");
//! }
//! ```

pub mod backend;
pub mod error;
pub mod execution;
pub mod info;
pub mod job;
pub mod registry;
pub mod result;
pub mod shots;

pub use backend::{Backend, BackendFactory, DEFAULT_WAIT_LIMIT, POLL_INTERVAL};
pub use error::{HalError, HalResult};
pub use execution::{ExecutionHandle, execute};
pub use info::{BackendInfo, DeviceType, Paradigm};
pub use job::{Job, JobId, JobStatus};
pub use registry::BackendRegistry;
pub use result::{Counts, ExecutionResult};
pub use shots::{FixedShots, LinearShotsEstimator, ShotsEstimator, ShotsPolicy};
