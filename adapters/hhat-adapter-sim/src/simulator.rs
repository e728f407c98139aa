//! Simulator backend implementation.

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, instrument};
use uuid::Uuid;

use hhat_hal::{
    Backend, BackendFactory, BackendInfo, Counts, ExecutionResult, HalError, HalResult, Job,
    JobId, JobStatus, Paradigm,
};

use crate::circuit::Circuit;
use crate::parser::parse;
use crate::statevector::Statevector;

/// Job data for the simulator.
struct SimJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Local statevector simulator for `OpenQASM` 2 programs.
///
/// The state is evolved once per job and measured shots are sampled from
/// the final distribution, so mid-circuit measurements behave as if they
/// were deferred to the end.
pub struct SimulatorBackend {
    info: BackendInfo,
    jobs: Arc<Mutex<FxHashMap<String, SimJob>>>,
    seed: Option<u64>,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::from_parts(BackendInfo::default())
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self::from_parts(BackendInfo::simulator("simulator", max_qubits))
    }

    /// Sample every job from the same fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn from_parts(info: BackendInfo) -> Self {
        Self {
            info,
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            seed: None,
        }
    }

    /// Evolve the state and sample `shots` outcomes.
    #[instrument(skip(self, circuit))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32) -> ExecutionResult {
        let start = Instant::now();
        debug!(
            "Starting simulation: {} qubits, {} shots",
            circuit.num_qubits, shots
        );

        let mut sv = Statevector::new(circuit.num_qubits);
        for op in &circuit.ops {
            sv.apply(op);
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut outcomes: FxHashMap<usize, u64> = FxHashMap::default();
        for _ in 0..shots {
            *outcomes.entry(sv.sample(&mut rng)).or_insert(0) += 1;
        }

        let measurements: Vec<(usize, usize)> = circuit.measurements().collect();
        let mut counts = Counts::new();
        for (outcome, n) in outcomes {
            counts.insert(
                outcome_to_bitstring(outcome, &measurements, circuit.num_clbits),
                n,
            );
        }

        let elapsed = start.elapsed();
        debug!("Simulation completed in {:?}", elapsed);

        ExecutionResult::new(counts, shots).with_execution_time(elapsed.as_millis() as u64)
    }

    fn lock_jobs(&self) -> std::sync::MutexGuard<'_, FxHashMap<String, SimJob>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Classical register contents for a sampled basis state, highest clbit
/// first. Clbits that are never written read as `0`.
fn outcome_to_bitstring(outcome: usize, measurements: &[(usize, usize)], num_clbits: usize) -> String {
    let mut bits = vec![b'0'; num_clbits];
    for &(qubit, clbit) in measurements {
        bits[clbit] = if outcome & (1 << qubit) != 0 { b'1' } else { b'0' };
    }
    bits.iter().rev().map(|&b| b as char).collect()
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.info.name
    }

    fn info(&self) -> &BackendInfo {
        &self.info
    }

    #[instrument(skip(self, program))]
    async fn submit(&self, program: &str, shots: u32) -> HalResult<JobId> {
        if shots == 0 {
            return Err(HalError::InvalidShots("shots must be positive".into()));
        }

        let circuit = parse(program)?;
        let required = u32::try_from(circuit.num_qubits).unwrap_or(u32::MAX);
        if required > self.info.max_qubits {
            return Err(HalError::ProgramTooLarge {
                backend: self.info.name.clone(),
                required,
                available: self.info.max_qubits,
            });
        }
        if circuit.num_clbits == 0 {
            return Err(HalError::InvalidProgram(
                "program declares no classical bits to report".into(),
            ));
        }

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let job = Job::new(job_id.clone(), self.info.name.clone(), shots, required);
        self.lock_jobs().insert(
            job_id.0.clone(),
            SimJob { job, result: None },
        );
        debug!("Submitted job: {}", job_id);

        let result = self.run_simulation(&circuit, shots);

        if let Some(sim_job) = self.lock_jobs().get_mut(&job_id.0) {
            sim_job.job.transition(JobStatus::Running);
            if sim_job.job.transition(JobStatus::Completed) {
                sim_job.result = Some(result);
            }
        }

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        self.lock_jobs()
            .get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    /// Hand out the result of a finished job. The job is dropped from the
    /// backend once it has been read, so each result can be taken once.
    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let mut jobs = self.lock_jobs();
        let status = jobs
            .get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        if !status.is_terminal() {
            return Err(HalError::Backend(format!(
                "job {job_id} has no result yet ({status})"
            )));
        }

        let sim_job = jobs
            .remove(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        debug!("Evicted job {}", job_id);
        match (status, sim_job.result) {
            (JobStatus::Completed, Some(result)) => Ok(result),
            (JobStatus::Cancelled, _) => Err(HalError::JobCancelled),
            (JobStatus::Failed(msg), _) => Err(HalError::JobFailed(msg)),
            (status, None) => Err(HalError::Backend(format!(
                "job {job_id} finished as {status} without a result"
            ))),
            (_, Some(_)) => Err(HalError::Backend(format!(
                "job {job_id} holds a result it never completed"
            ))),
        }
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = self.lock_jobs();
        let sim_job = jobs
            .get_mut(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        if !sim_job.job.transition(JobStatus::Cancelled) {
            debug!("Job {} already finished; cancel ignored", job_id);
        }
        Ok(())
    }
}

impl BackendFactory for SimulatorBackend {
    fn from_info(info: BackendInfo) -> HalResult<Self> {
        if !info.supports(Paradigm::Digital) {
            return Err(HalError::BackendUnavailable(format!(
                "'{}' does not support the digital paradigm",
                info.name
            )));
        }
        Ok(Self::from_parts(info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "OPENQASM 2.0;\ninclude \"qelib1.inc\";\n";

    #[tokio::test]
    async fn test_simulator_info() {
        let backend = SimulatorBackend::new();
        assert!(backend.info().is_simulator());
        assert_eq!(backend.info().max_qubits, 20);
    }

    #[tokio::test]
    async fn test_simulator_bell_state() {
        let backend = SimulatorBackend::new();
        let program =
            format!("{HEADER}qreg q[2];\ncreg c[2];\nh q[0];\ncx q[0], q[1];\nmeasure q -> c;\n");

        let job_id = backend.submit(&program, 1000).await.unwrap();
        assert!(backend.status(&job_id).await.unwrap().is_success());

        let result = backend.result(&job_id).await.unwrap();
        assert_eq!(result.shots, 1000);
        let counts = &result.counts;
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert_eq!(counts.get("01") + counts.get("10"), 0);
    }

    #[tokio::test]
    async fn test_highest_clbit_leftmost() {
        let backend = SimulatorBackend::new();
        let program = format!("{HEADER}qreg q[3];\ncreg c[3];\nx q[0];\nmeasure q -> c;\n");

        let job_id = backend.submit(&program, 50).await.unwrap();
        let result = backend.result(&job_id).await.unwrap();
        assert_eq!(result.counts.get("001"), 50);
    }

    #[tokio::test]
    async fn test_partial_measurement() {
        let backend = SimulatorBackend::new();
        let program =
            format!("{HEADER}qreg q[2];\ncreg c[2];\nx q[0];\nmeasure q[0] -> c[1];\n");

        let job_id = backend.submit(&program, 10).await.unwrap();
        let result = backend.result(&job_id).await.unwrap();
        assert_eq!(result.counts.get("10"), 10);
    }

    #[tokio::test]
    async fn test_seeded_runs_repeat() {
        let program = format!("{HEADER}qreg q[3];\ncreg c[3];\nh q;\nmeasure q -> c;\n");
        let a = SimulatorBackend::new().with_seed(42);
        let b = SimulatorBackend::new().with_seed(42);

        let ra = a.result(&a.submit(&program, 500).await.unwrap()).await.unwrap();
        let rb = b.result(&b.submit(&program, 500).await.unwrap()).await.unwrap();
        assert_eq!(ra.counts, rb.counts);
    }

    #[tokio::test]
    async fn test_result_is_taken_once() {
        let backend = SimulatorBackend::new();
        let program = format!("{HEADER}qreg q[1];\ncreg c[1];\nmeasure q -> c;\n");

        let job_id = backend.submit(&program, 5).await.unwrap();
        assert_eq!(backend.result(&job_id).await.unwrap().shots, 5);
        assert!(matches!(
            backend.result(&job_id).await,
            Err(HalError::JobNotFound(_))
        ));
        assert!(matches!(
            backend.status(&job_id).await,
            Err(HalError::JobNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_simulator_too_many_qubits() {
        let backend = SimulatorBackend::with_max_qubits(2);
        let program = format!("{HEADER}qreg q[3];\ncreg c[3];\nmeasure q -> c;\n");

        let result = backend.submit(&program, 100).await;
        assert!(matches!(
            result,
            Err(HalError::ProgramTooLarge {
                required: 3,
                available: 2,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_invalid_program() {
        let backend = SimulatorBackend::new();
        assert!(matches!(
            backend.submit("OPENQASM 2.0;\nqreg q[1];\nfoo q[0];", 10).await,
            Err(HalError::InvalidProgram(_))
        ));
        assert!(matches!(
            backend.submit("OPENQASM 2.0;\nqreg q[1];\nh q[0];", 10).await,
            Err(HalError::InvalidProgram(_))
        ));
        assert!(matches!(
            backend.status(&JobId::new("missing")).await,
            Err(HalError::JobNotFound(_))
        ));
    }

    #[test]
    fn test_factory_requires_digital() {
        let mut info = BackendInfo::simulator("analog-only", 4);
        info.paradigms = vec![Paradigm::Analog];
        assert!(SimulatorBackend::from_info(info).is_err());
        assert!(SimulatorBackend::from_info(BackendInfo::simulator("local", 4)).is_ok());
    }
}
