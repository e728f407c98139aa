//! One quantum variable's program: lowering plus execution.

use std::sync::Arc;

use tracing::{debug, instrument};

use hhat_hal::{Backend, Counts, ExecutionHandle, execute};
use hhat_ir::BlockIR;
use hhat_mem::{IndexManager, MemError};
use hhat_qlang::{ClassicalEvaluator, LowLevelQLang, OpenQasm2};
use hhat_types::FullName;

use crate::config::ExecutionConfig;
use crate::error::{CastError, CastResult};

/// The block accumulated for a quantum variable, together with the index
/// pool that holds its allocation.
#[derive(Debug, Clone, Copy)]
pub struct QuantumProgram<'a> {
    var: &'a FullName,
    block: &'a BlockIR,
    idx: &'a IndexManager,
}

impl<'a> QuantumProgram<'a> {
    pub fn new(var: &'a FullName, block: &'a BlockIR, idx: &'a IndexManager) -> Self {
        Self { var, block, idx }
    }

    pub fn var(&self) -> &FullName {
        self.var
    }

    /// Number of indices the variable holds.
    pub fn num_idxs(&self) -> CastResult<usize> {
        self.idx
            .indexes_of(self.var)
            .map(<[usize]>::len)
            .ok_or_else(|| MemError::IndexInvalidVar(self.var.clone()).into())
    }

    /// `OpenQASM` 2 text for the block.
    pub fn lower(&self, fallback: &dyn ClassicalEvaluator) -> CastResult<String> {
        let qlang = OpenQasm2::new(self.var.clone(), self.idx, fallback)?;
        Ok(qlang.gen_program(self.block)?)
    }

    /// Lower and submit, returning a handle that can be waited on or
    /// cancelled.
    #[instrument(skip_all, fields(var = %self.var, backend = backend.name()))]
    pub async fn submit(
        &self,
        backend: Arc<dyn Backend>,
        execution: &ExecutionConfig,
        fallback: &dyn ClassicalEvaluator,
    ) -> CastResult<ExecutionHandle> {
        let code = self.lower(fallback)?;
        let shots = execution.shots_for(self.num_idxs()?);
        debug!("Submitting {} lines for {} shots", code.lines().count(), shots);
        execute(backend, &code, shots)
            .await
            .map_err(|e| CastError::from_execution(self.var, e))
    }

    /// Lower, execute and wait for counts.
    ///
    /// Every bitstring in the returned counts has one character per index
    /// and the counts sum to the shots that were run.
    pub async fn run(
        &self,
        backend: Arc<dyn Backend>,
        execution: &ExecutionConfig,
        fallback: &dyn ClassicalEvaluator,
    ) -> CastResult<Counts> {
        let handle = self.submit(backend, execution, fallback).await?;
        let result = handle
            .wait(execution.timeout())
            .await
            .map_err(|e| CastError::from_execution(self.var, e))?;

        let width = self.num_idxs()?;
        if let Some((bitstring, _)) = result.counts.iter().find(|(k, _)| k.len() != width) {
            return Err(CastError::InvalidQuantumComputedResult {
                variable: self.var.clone(),
                reason: format!("bitstring '{bitstring}' does not span {width} indexes"),
            });
        }
        debug!(
            "'{}' produced {} distinct outcomes over {} shots",
            self.var,
            result.counts.len(),
            result.shots
        );
        Ok(result.counts)
    }
}
