//! `OpenQASM` 2 lowering.
//!
//! Produces programs of the exact shape:
//!
//! ```text
//! OPENQASM 2.0;
//! include "qelib1.inc";
//! qreg q[N];
//! creg c[N];
//! <one line per emitted statement>
//! measure q -> c;
//! ```
//!
//! `N` is the number of indices the variable holds when the lowering is
//! built. Register position `i` stands for the variable's `i`-th allocated
//! index, so the text is the same whichever pool indices were granted.

mod instructions;

pub use instructions::{InstrArgs, InstrHandler, QInstrName};

use tracing::{debug, instrument, trace};

use hhat_ir::{ArgIR, InstrIR, Literal};
use hhat_mem::{IndexManager, MemError};
use hhat_types::FullName;

use crate::error::{QLangError, QLangResult};
use crate::fallback::ClassicalEvaluator;
use crate::qlang::LowLevelQLang;

pub const HEADER: [&str; 2] = ["OPENQASM 2.0;", "include \"qelib1.inc\";"];

/// Lowering of one quantum variable's block to `OpenQASM` 2.
pub struct OpenQasm2<'a> {
    var: FullName,
    indexes: Vec<usize>,
    slots: Vec<usize>,
    fallback: &'a dyn ClassicalEvaluator,
}

impl<'a> OpenQasm2<'a> {
    /// Snapshot `var`'s allocation from `idx`.
    ///
    /// Fails with [`MemError::IndexInvalidVar`] if `var` holds no indices.
    pub fn new(
        var: FullName,
        idx: &IndexManager,
        fallback: &'a dyn ClassicalEvaluator,
    ) -> QLangResult<Self> {
        let indexes = idx
            .indexes_of(&var)
            .ok_or_else(|| MemError::IndexInvalidVar(var.clone()))?
            .to_vec();
        let slots = (0..indexes.len()).collect();
        debug!("Lowering '{}' over indexes {:?}", var, indexes);
        Ok(Self {
            var,
            indexes,
            slots,
            fallback,
        })
    }

    pub fn var(&self) -> &FullName {
        &self.var
    }

    /// Pool indices behind register positions `0..N`.
    pub fn indexes(&self) -> &[usize] {
        &self.indexes
    }

    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    /// State preparation for a quantum literal: `x` on every set bit, least
    /// significant bit on the first slot.
    fn prepare_literal(&self, literal: &Literal, instr: &InstrIR) -> QLangResult<Vec<String>> {
        let Some(core) = literal.as_core() else {
            return Err(QLangError::UnsupportedArg {
                instr: instr.name().to_string(),
                arg: literal.to_string(),
            });
        };
        let overflow = || QLangError::LiteralOverflow {
            literal: core.to_string(),
            slots: self.slots.len(),
        };
        let bits = core.value().as_bits().ok_or_else(overflow)?;
        let width = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        if width < u64::BITS && bits >> width != 0 {
            return Err(overflow());
        }
        let set = core.set_bits(width).ok_or_else(overflow)?;
        Ok(set.into_iter().map(|k| format!("x q[{k}];")).collect())
    }

    /// Lower the arguments of `instr`, returning the statements they emit and
    /// the literals they resolved to.
    fn gen_args(&self, instr: &InstrIR) -> QLangResult<(Vec<String>, Vec<Literal>)> {
        let mut code = Vec::new();
        let mut literals = Vec::new();

        for arg in instr.args() {
            let resolved = match arg {
                ArgIR::Literal(literal) => literal.clone(),
                ArgIR::Symbol(name) => self
                    .fallback
                    .lookup(name)
                    .ok_or_else(|| QLangError::UnknownSymbol(name.clone()))?,
                ArgIR::Instr(nested) if nested.is_quantum() => {
                    code.extend(self.gen_instr(nested)?);
                    continue;
                }
                ArgIR::Instr(nested) => self.evaluate_classical(nested)?,
            };

            if resolved.is_quantum() {
                code.extend(self.prepare_literal(&resolved, instr)?);
            }
            literals.push(resolved);
        }

        Ok((code, literals))
    }

    fn evaluate_classical(&self, instr: &InstrIR) -> QLangResult<Literal> {
        trace!("Falling back to classical evaluation of '{}'", instr.name());
        self.fallback
            .evaluate(instr)
            .map_err(|reason| QLangError::Fallback {
                instr: instr.name().to_string(),
                reason,
            })
    }
}

impl LowLevelQLang for OpenQasm2<'_> {
    fn init_program(&self) -> Vec<String> {
        let n = self.slots.len();
        let mut lines: Vec<String> = HEADER.iter().map(ToString::to_string).collect();
        lines.push(format!("qreg q[{n}];"));
        lines.push(format!("creg c[{n}];"));
        lines
    }

    #[instrument(skip(self, instr), fields(var = %self.var, instr = %instr.name()))]
    fn gen_instr(&self, instr: &InstrIR) -> QLangResult<Vec<String>> {
        let (mut code, literals) = self.gen_args(instr)?;
        let name = instr.name().name();

        match name.parse::<QInstrName>() {
            Ok(qinstr) => {
                let args = InstrArgs {
                    slots: &self.slots,
                    literals: &literals,
                };
                let (stmts, status) = qinstr.handler()(&args);
                if !status.is_done() {
                    return Err(QLangError::InstrStatus {
                        instr: instr.name().to_string(),
                        status,
                    });
                }
                code.extend(stmts);
            }
            Err(()) if instr.is_quantum() => {
                return Err(QLangError::InstrNotFound(instr.name().to_string()));
            }
            Err(()) => {
                // runs on the host; its value has no place in the circuit
                let value = self.evaluate_classical(instr)?;
                debug!("Discarding result {} of classical '{}'", value, instr.name());
            }
        }

        Ok(code)
    }

    fn end_program(&self) -> Vec<String> {
        vec!["measure q -> c;".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::{NoFallback, StaticScope};
    use hhat_ir::{BlockIR, CoreLiteral, Value};

    fn manager_with(var: &str, n: usize) -> IndexManager {
        let mut idx = IndexManager::new(8);
        idx.request(&FullName::local(var), n).unwrap();
        idx
    }

    #[test]
    fn test_header_sized_to_allocation() {
        let idx = manager_with("@v", 3);
        let qlang = OpenQasm2::new(FullName::local("@v"), &idx, &NoFallback).unwrap();
        assert_eq!(
            qlang.init_program(),
            vec![
                "OPENQASM 2.0;",
                "include \"qelib1.inc\";",
                "qreg q[3];",
                "creg c[3];"
            ]
        );
        assert_eq!(qlang.end_program(), vec!["measure q -> c;"]);
    }

    #[test]
    fn test_unallocated_variable() {
        let idx = IndexManager::new(4);
        let err = OpenQasm2::new(FullName::local("@v"), &idx, &NoFallback).err();
        assert_eq!(
            err,
            Some(QLangError::Mem(MemError::IndexInvalidVar(FullName::local("@v"))))
        );
    }

    #[test]
    fn test_quantum_literal_prepares_state() {
        let idx = manager_with("@v", 3);
        let qlang = OpenQasm2::new(FullName::local("@v"), &idx, &NoFallback).unwrap();

        let instr = InstrIR::call("@redim", [CoreLiteral::quantum(5, "@u3").into()]);
        let code = qlang.gen_instr(&instr).unwrap();
        assert_eq!(
            code,
            vec!["x q[0];", "x q[2];", "h q[0];", "h q[1];", "h q[2];"]
        );
    }

    #[test]
    fn test_literal_overflow() {
        let idx = manager_with("@v", 2);
        let qlang = OpenQasm2::new(FullName::local("@v"), &idx, &NoFallback).unwrap();

        let instr = InstrIR::call("@redim", [CoreLiteral::quantum(5, "@u3").into()]);
        assert!(matches!(
            qlang.gen_instr(&instr),
            Err(QLangError::LiteralOverflow { slots: 2, .. })
        ));
    }

    #[test]
    fn test_symbol_lookup() {
        let idx = manager_with("@v", 2);
        let scope = StaticScope::new().bind("@w", CoreLiteral::quantum(2, "@u2"));
        let qlang = OpenQasm2::new(FullName::local("@v"), &idx, &scope).unwrap();

        let instr = InstrIR::call("@not", [FullName::local("@w").into()]);
        assert_eq!(
            qlang.gen_instr(&instr).unwrap(),
            vec!["x q[1];", "x q[0];", "x q[1];"]
        );

        let missing = InstrIR::call("@not", [FullName::local("@z").into()]);
        assert_eq!(
            qlang.gen_instr(&missing),
            Err(QLangError::UnknownSymbol(FullName::local("@z")))
        );
    }

    #[test]
    fn test_unknown_quantum_instruction() {
        let idx = manager_with("@v", 1);
        let qlang = OpenQasm2::new(FullName::local("@v"), &idx, &NoFallback).unwrap();

        let block = BlockIR::from_instrs([InstrIR::call("@teleport", [])]);
        assert_eq!(
            qlang.gen_program(&block),
            Err(QLangError::InstrNotFound("@teleport".into()))
        );
    }

    #[test]
    fn test_handler_status_propagates() {
        let idx = manager_with("@v", 1);
        let qlang = OpenQasm2::new(FullName::local("@v"), &idx, &NoFallback).unwrap();

        assert!(matches!(
            qlang.gen_instr(&InstrIR::call("@sync", [])),
            Err(QLangError::InstrStatus {
                status: crate::InstrStatus::Error,
                ..
            })
        ));
    }

    #[test]
    fn test_classical_instruction_uses_fallback() {
        let idx = manager_with("@v", 1);
        let qlang = OpenQasm2::new(FullName::local("@v"), &idx, &NoFallback).unwrap();

        assert!(matches!(
            qlang.gen_instr(&InstrIR::call("add", [])),
            Err(QLangError::Fallback { .. })
        ));
    }

    struct Constant;

    impl ClassicalEvaluator for Constant {
        fn evaluate(&self, _instr: &InstrIR) -> Result<Literal, String> {
            Ok(Literal::core(Value::UInt(7), "u8"))
        }

        fn lookup(&self, _name: &FullName) -> Option<Literal> {
            None
        }
    }

    #[test]
    fn test_classical_results_stay_on_host() {
        let idx = manager_with("@v", 2);
        let qlang = OpenQasm2::new(FullName::local("@v"), &idx, &Constant).unwrap();

        assert_eq!(qlang.gen_instr(&InstrIR::call("add", [])).unwrap(), Vec::<String>::new());

        let nested = InstrIR::call("@not", [InstrIR::call("add", []).into()]);
        assert!(matches!(
            qlang.gen_instr(&nested),
            Err(QLangError::InstrStatus {
                status: crate::InstrStatus::Error,
                ..
            })
        ));
    }
}
