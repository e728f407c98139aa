//! Casts between classical and quantum types.
//!
//! | Origin | Target | Path |
//! |--------|--------|------|
//! | quantum | classical | lower, execute, resolve, spec, range check |
//! | quantum | other quantum | lower, execute, resolve to an integer, encode as basis state |
//! | quantum | same quantum | rejected |
//! | classical | classical | range-checked conversion |
//! | classical | quantum | encode as basis state |
//!
//! A quantum *literal* origin is already a basis state and converts without
//! a backend run.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument};

use hhat_hal::{Backend, Counts};
use hhat_ir::{CoreLiteral, Literal, Value};
use hhat_qlang::{ClassicalEvaluator, NoFallback};
use hhat_types::{FullName, QSize, TypeError, TypeTable};

use crate::config::RuntimeConfig;
use crate::convert;
use crate::error::{CastError, CastResult};
use crate::program::QuantumProgram;
use crate::resolver::{Resolved, Resolver};
use crate::spec::TypeSpec;

/// Classical or quantum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataParadigm {
    Classical,
    Quantum,
}

impl DataParadigm {
    pub fn of(name: &FullName) -> Self {
        if name.is_quantum() {
            DataParadigm::Quantum
        } else {
            DataParadigm::Classical
        }
    }
}

/// The value being cast.
#[derive(Debug, Clone)]
pub enum CastInput<'a> {
    /// An already known value.
    Literal(Literal),
    /// A quantum variable whose program must run first.
    Quantum(QuantumProgram<'a>),
}

/// The cast result.
#[derive(Debug, Clone, PartialEq)]
pub enum CastOutput {
    Literal(Literal),
    /// The raw distribution, when the resolver keeps it.
    Distribution(Counts),
}

impl CastOutput {
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            CastOutput::Literal(lit) => Some(lit),
            CastOutput::Distribution(_) => None,
        }
    }

    pub fn as_counts(&self) -> Option<&Counts> {
        match self {
            CastOutput::Distribution(counts) => Some(counts),
            CastOutput::Literal(_) => None,
        }
    }
}

/// Everything a cast may need besides its input.
pub struct CastContext<'a> {
    config: &'a RuntimeConfig,
    backend: Arc<dyn Backend>,
    types: &'a TypeTable,
    resolver: Arc<dyn Resolver>,
    fallback: &'a dyn ClassicalEvaluator,
}

impl fmt::Debug for CastContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CastContext")
            .field("backend", &self.backend.name())
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl<'a> CastContext<'a> {
    /// Context using the configured resolver and no classical evaluator.
    ///
    /// Quantum widths are read from `types`, which should be resolved
    /// beforehand (see [`TypeTable::resolve_all`]).
    pub fn new(config: &'a RuntimeConfig, backend: Arc<dyn Backend>, types: &'a TypeTable) -> Self {
        Self {
            config,
            backend,
            types,
            resolver: Arc::new(config.resolver),
            fallback: &NoFallback,
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_fallback(mut self, fallback: &'a dyn ClassicalEvaluator) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        self.config
    }

    /// Index count of the quantum type `name`.
    fn quantum_size(&self, name: &FullName) -> CastResult<QSize> {
        let ty = self
            .types
            .get(name)
            .ok_or_else(|| TypeError::UnknownType(name.clone()))?;
        ty.qsize().ok_or_else(|| CastError::UnsupportedConversion {
            value: name.to_string(),
            target: name.clone(),
            reason: "quantum size is not resolved".to_string(),
        })
    }

    fn quantum_width(&self, name: &FullName) -> CastResult<u32> {
        let qsize = self.quantum_size(name)?;
        Ok(qsize.max().unwrap_or(qsize.min()))
    }
}

/// A conversion from `origin` type to `target` type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cast {
    origin: FullName,
    target: FullName,
    from_paradigm: DataParadigm,
    to_paradigm: DataParadigm,
}

impl Cast {
    pub fn new(origin: impl Into<FullName>, target: impl Into<FullName>) -> Self {
        let origin = origin.into();
        let target = target.into();
        Self {
            from_paradigm: DataParadigm::of(&origin),
            to_paradigm: DataParadigm::of(&target),
            origin,
            target,
        }
    }

    pub fn origin(&self) -> &FullName {
        &self.origin
    }

    pub fn target(&self) -> &FullName {
        &self.target
    }

    pub fn from_paradigm(&self) -> DataParadigm {
        self.from_paradigm
    }

    pub fn to_paradigm(&self) -> DataParadigm {
        self.to_paradigm
    }

    fn unsupported(&self, reason: &str) -> CastError {
        CastError::UnsupportedConversion {
            value: self.origin.to_string(),
            target: self.target.clone(),
            reason: reason.to_string(),
        }
    }

    /// Cast `input` to the target type.
    #[instrument(skip_all, fields(origin = %self.origin, target = %self.target))]
    pub async fn apply(&self, input: CastInput<'_>, ctx: &CastContext<'_>) -> CastResult<CastOutput> {
        use DataParadigm::{Classical, Quantum};

        if self.from_paradigm == Quantum && self.origin == self.target {
            return Err(self.unsupported("origin and target are the same quantum type"));
        }

        match input {
            CastInput::Literal(literal) => self.cast_literal(&literal, ctx).map(CastOutput::Literal),
            CastInput::Quantum(_) if self.from_paradigm == Classical => {
                Err(self.unsupported("a quantum program needs a quantum origin type"))
            }
            CastInput::Quantum(program) => {
                self.check_width(&program, ctx)?;
                let counts = program
                    .run(ctx.backend.clone(), &ctx.config.execution, ctx.fallback)
                    .await?;
                match self.to_paradigm {
                    Classical => self.resolve_classical(program.var(), &counts, ctx),
                    Quantum => self
                        .resolve_quantum(program.var(), &counts, ctx)
                        .map(|lit| CastOutput::Literal(lit.into())),
                }
            }
        }
    }

    /// The variable must hold as many indices as the origin type spans.
    fn check_width(&self, program: &QuantumProgram<'_>, ctx: &CastContext<'_>) -> CastResult<()> {
        let qsize = ctx.quantum_size(&self.origin)?;
        let held = program.num_idxs()?;
        let fits = u32::try_from(held).is_ok_and(|n| {
            n >= qsize.min() && qsize.max().is_none_or(|max| n <= max)
        });
        if fits {
            return Ok(());
        }
        let expected = match qsize.max() {
            Some(max) if max == qsize.min() => max.to_string(),
            Some(max) => format!("{}..={}", qsize.min(), max),
            None => format!("at least {}", qsize.min()),
        };
        Err(CastError::WidthMismatch {
            variable: program.var().clone(),
            origin: self.origin.clone(),
            expected,
            held,
        })
    }

    fn cast_literal(&self, literal: &Literal, ctx: &CastContext<'_>) -> CastResult<Literal> {
        let Some(core) = literal.as_core() else {
            return Err(self.unsupported("only core literals convert directly"));
        };
        let value = core.value();
        let converted = match self.to_paradigm {
            DataParadigm::Classical => {
                Literal::core(convert::to_classical(value, &self.target)?, self.target.clone())
            }
            DataParadigm::Quantum => {
                let width = ctx.quantum_width(&self.target)?;
                convert::to_quantum(value, &self.target, width)?.into()
            }
        };
        debug!("Cast {} to {}", literal, converted);
        Ok(converted)
    }

    fn resolve(
        &self,
        var: &FullName,
        counts: &Counts,
        spec: TypeSpec,
        ctx: &CastContext<'_>,
    ) -> CastResult<Resolved> {
        ctx.resolver
            .resolve(counts, spec)
            .map_err(|e| CastError::InvalidQuantumComputedResult {
                variable: var.clone(),
                reason: e.to_string(),
            })
    }

    fn resolve_classical(
        &self,
        var: &FullName,
        counts: &Counts,
        ctx: &CastContext<'_>,
    ) -> CastResult<CastOutput> {
        let spec = TypeSpec::for_type(&self.target)
            .ok_or_else(|| self.unsupported("target has no resolver spec"))?;

        match self.resolve(var, counts, spec, ctx)? {
            Resolved::Distribution(counts) => Ok(CastOutput::Distribution(counts)),
            Resolved::Value(value) => {
                let value = convert::to_classical(&value, &self.target)?;
                debug!("Resolved '{}' to {}", var, value);
                Ok(CastOutput::Literal(Literal::core(value, self.target.clone())))
            }
        }
    }

    fn resolve_quantum(
        &self,
        var: &FullName,
        counts: &Counts,
        ctx: &CastContext<'_>,
    ) -> CastResult<CoreLiteral> {
        let width = ctx.quantum_width(&self.target)?;
        match self.resolve(var, counts, TypeSpec::Int, ctx)? {
            Resolved::Value(value @ (Value::Int(_) | Value::UInt(_))) => {
                convert::to_quantum(&value, &self.target, width)
            }
            Resolved::Value(other) => Err(CastError::UnsupportedConversion {
                value: other.to_string(),
                target: self.target.clone(),
                reason: "not a basis state".to_string(),
            }),
            Resolved::Distribution(_) => {
                Err(self.unsupported("a distribution cannot initialize a quantum value"))
            }
        }
    }
}
