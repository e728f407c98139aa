//! Backend trait.
//!
//! The [`Backend`] trait covers the job lifecycle for a target that accepts
//! low-level quantum program text:
//!
//! ```text
//!   info() ──→ submit() ──→ status() ──→ result()
//!   (sync)     (async)      (async)      (async)
//!                  └──────→ cancel()
//! ```
//!
//! | Method | Kind | Required | Returns |
//! |--------|------|----------|---------|
//! | `name()` | sync | yes | `&str` |
//! | `info()` | sync | yes | `&BackendInfo` |
//! | `submit()` | async | yes | `HalResult<JobId>` |
//! | `status()` | async | yes | `HalResult<JobStatus>` |
//! | `result()` | async | yes | `HalResult<ExecutionResult>` |
//! | `cancel()` | async | yes | `HalResult<()>` |
//! | `wait()` | async | provided | `HalResult<ExecutionResult>` |

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{Instant, sleep};

use crate::error::{HalError, HalResult};
use crate::info::BackendInfo;
use crate::job::{JobId, JobStatus};
use crate::result::ExecutionResult;

/// Interval between status polls in [`Backend::wait`].
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Upper bound on [`Backend::wait`] when no timeout is given.
pub const DEFAULT_WAIT_LIMIT: Duration = Duration::from_secs(300);

/// An execution target for program text.
///
/// - `info()` is synchronous and infallible; backends cache it at
///   construction.
/// - `submit()` returns a job in `Queued` (or a later) state.
/// - `result()` is only valid once `status()` reports `Completed`. A
///   backend may forget the job after handing out its result.
#[async_trait]
pub trait Backend: Send + Sync {
    fn name(&self) -> &str;

    fn info(&self) -> &BackendInfo;

    /// Load `program` into the backend's native representation and run it
    /// `shots` times.
    async fn submit(&self, program: &str, shots: u32) -> HalResult<JobId>;

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult>;

    async fn cancel(&self, job_id: &JobId) -> HalResult<()>;

    /// Poll until the job finishes or `timeout` elapses.
    ///
    /// A timeout is reported as [`HalError::Timeout`] and never retried.
    async fn wait(&self, job_id: &JobId, timeout: Option<Duration>) -> HalResult<ExecutionResult> {
        let deadline = Instant::now() + timeout.unwrap_or(DEFAULT_WAIT_LIMIT);

        loop {
            match self.status(job_id).await? {
                JobStatus::Completed => return self.result(job_id).await,
                JobStatus::Failed(msg) => return Err(HalError::JobFailed(msg)),
                JobStatus::Cancelled => return Err(HalError::JobCancelled),
                JobStatus::Queued | JobStatus::Running => {
                    if Instant::now() >= deadline {
                        return Err(HalError::Timeout(job_id.0.clone()));
                    }
                    sleep(POLL_INTERVAL).await;
                }
            }
        }
    }
}

/// Backends constructible from a descriptor, for use with the registry.
pub trait BackendFactory: Backend + Sized {
    fn from_info(info: BackendInfo) -> HalResult<Self>;
}
