//! Program execution with a cancellation handle.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::backend::Backend;
use crate::error::{HalError, HalResult};
use crate::job::{JobId, JobStatus};
use crate::result::ExecutionResult;

/// A submitted program: wait for its result or cancel it.
#[derive(Clone)]
pub struct ExecutionHandle {
    job_id: JobId,
    shots: u32,
    backend: Arc<dyn Backend>,
}

impl fmt::Debug for ExecutionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionHandle")
            .field("job_id", &self.job_id)
            .field("shots", &self.shots)
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl ExecutionHandle {
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn shots(&self) -> u32 {
        self.shots
    }

    pub async fn status(&self) -> HalResult<JobStatus> {
        self.backend.status(&self.job_id).await
    }

    /// Ask the backend to abandon the job.
    pub async fn cancel(&self) -> HalResult<()> {
        debug!("Cancelling job {}", self.job_id);
        self.backend.cancel(&self.job_id).await
    }

    /// Wait for the job and validate its counts.
    ///
    /// Empty or malformed counts are reported as [`HalError::InvalidResult`].
    pub async fn wait(&self, timeout: Option<Duration>) -> HalResult<ExecutionResult> {
        let result = self.backend.wait(&self.job_id, timeout).await?;
        if let Err(e) = result.counts.validate(self.shots) {
            warn!("Job {} returned malformed counts: {}", self.job_id, e);
            return Err(e);
        }
        Ok(result)
    }
}

/// Submit `program` for `shots` repetitions.
#[instrument(skip(backend, program), fields(backend = backend.name()))]
pub async fn execute(
    backend: Arc<dyn Backend>,
    program: &str,
    shots: u32,
) -> HalResult<ExecutionHandle> {
    if shots == 0 {
        return Err(HalError::InvalidShots("shots must be positive".into()));
    }
    let job_id = backend.submit(program, shots).await?;
    debug!("Submitted job {} ({} shots)", job_id, shots);
    Ok(ExecutionHandle {
        job_id,
        shots,
        backend,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::BackendInfo;
    use crate::result::Counts;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Backend whose jobs never leave `Running` unless cancelled, or that
    /// completes immediately with canned counts.
    struct MockBackend {
        info: BackendInfo,
        counts: Option<Counts>,
        status: Mutex<JobStatus>,
    }

    impl MockBackend {
        fn pending() -> Self {
            Self {
                info: BackendInfo::simulator("mock", 4),
                counts: None,
                status: Mutex::new(JobStatus::Running),
            }
        }

        fn completed(counts: Counts) -> Self {
            Self {
                info: BackendInfo::simulator("mock", 4),
                counts: Some(counts),
                status: Mutex::new(JobStatus::Completed),
            }
        }
    }

    #[async_trait]
    impl Backend for MockBackend {
        fn name(&self) -> &str {
            &self.info.name
        }

        fn info(&self) -> &BackendInfo {
            &self.info
        }

        async fn submit(&self, _program: &str, _shots: u32) -> HalResult<JobId> {
            Ok(JobId::new("mock-1"))
        }

        async fn status(&self, _job_id: &JobId) -> HalResult<JobStatus> {
            Ok(self.status.lock().unwrap().clone())
        }

        async fn result(&self, _job_id: &JobId) -> HalResult<ExecutionResult> {
            let counts = self.counts.clone().unwrap_or_default();
            let shots = counts.total() as u32;
            Ok(ExecutionResult::new(counts, shots))
        }

        async fn cancel(&self, _job_id: &JobId) -> HalResult<()> {
            *self.status.lock().unwrap() = JobStatus::Cancelled;
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_times_out() {
        let backend: Arc<dyn Backend> = Arc::new(MockBackend::pending());
        let handle = execute(backend, "OPENQASM 2.0;", 10).await.unwrap();

        let err = handle
            .wait(Some(Duration::from_millis(200)))
            .await
            .unwrap_err();
        assert!(matches!(err, HalError::Timeout(id) if id == "mock-1"));
    }

    #[tokio::test]
    async fn test_cancel_then_wait() {
        let backend: Arc<dyn Backend> = Arc::new(MockBackend::pending());
        let handle = execute(backend, "OPENQASM 2.0;", 10).await.unwrap();

        handle.cancel().await.unwrap();
        assert_eq!(handle.status().await.unwrap(), JobStatus::Cancelled);
        assert!(matches!(handle.wait(None).await, Err(HalError::JobCancelled)));
    }

    #[tokio::test]
    async fn test_wait_validates_counts() {
        let counts: Counts = [("0", 4), ("11", 6)].into_iter().collect();
        let backend: Arc<dyn Backend> = Arc::new(MockBackend::completed(counts));
        let handle = execute(backend, "OPENQASM 2.0;", 10).await.unwrap();

        assert!(matches!(
            handle.wait(None).await,
            Err(HalError::InvalidResult(_))
        ));
    }

    #[tokio::test]
    async fn test_wait_ok() {
        let counts: Counts = [("0", 4), ("1", 6)].into_iter().collect();
        let backend: Arc<dyn Backend> = Arc::new(MockBackend::completed(counts));
        let handle = execute(backend, "OPENQASM 2.0;", 10).await.unwrap();

        let result = handle.wait(None).await.unwrap();
        assert_eq!(result.counts.get("1"), 6);
    }

    #[tokio::test]
    async fn test_zero_shots_rejected() {
        let backend: Arc<dyn Backend> = Arc::new(MockBackend::pending());
        assert!(matches!(
            execute(backend, "", 0).await,
            Err(HalError::InvalidShots(_))
        ));
    }
}
