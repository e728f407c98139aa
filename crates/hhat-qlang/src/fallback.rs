//! Hand-off to the host's classical evaluator.
//!
//! Instructions the target language cannot express (arithmetic, string
//! handling, variable reads) are evaluated by the surrounding interpreter and
//! their result is spliced back into the lowering as a literal.

use rustc_hash::FxHashMap;

use hhat_ir::{InstrIR, Literal};
use hhat_types::FullName;

/// The classical side of a lowering pass.
pub trait ClassicalEvaluator {
    /// Evaluate a classical instruction to a literal.
    fn evaluate(&self, instr: &InstrIR) -> Result<Literal, String>;

    /// Current value bound to `name`, if any.
    fn lookup(&self, name: &FullName) -> Option<Literal>;
}

/// Evaluator for programs with no classical part.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFallback;

impl ClassicalEvaluator for NoFallback {
    fn evaluate(&self, instr: &InstrIR) -> Result<Literal, String> {
        Err(format!("no classical evaluator for '{}'", instr.name()))
    }

    fn lookup(&self, _name: &FullName) -> Option<Literal> {
        None
    }
}

/// Fixed bindings with no instruction support.
#[derive(Debug, Clone, Default)]
pub struct StaticScope {
    bindings: FxHashMap<FullName, Literal>,
}

impl StaticScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, name: impl Into<FullName>, value: impl Into<Literal>) -> Self {
        self.bindings.insert(name.into(), value.into());
        self
    }
}

impl ClassicalEvaluator for StaticScope {
    fn evaluate(&self, instr: &InstrIR) -> Result<Literal, String> {
        NoFallback.evaluate(instr)
    }

    fn lookup(&self, name: &FullName) -> Option<Literal> {
        self.bindings.get(name).cloned()
    }
}
