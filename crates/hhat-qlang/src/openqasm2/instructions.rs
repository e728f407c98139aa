//! `OpenQASM` 2 instruction catalog.

use std::str::FromStr;

use hhat_ir::Literal;

use crate::status::InstrStatus;

/// Quantum instructions with an `OpenQASM` 2 translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QInstrName {
    /// Put every slot in uniform superposition.
    Redim,
    /// Entangle every slot with the first one.
    Sync,
    /// Flip every slot.
    Not,
}

impl QInstrName {
    pub const ALL: [QInstrName; 3] = [QInstrName::Redim, QInstrName::Sync, QInstrName::Not];

    pub fn as_str(self) -> &'static str {
        match self {
            QInstrName::Redim => "@redim",
            QInstrName::Sync => "@sync",
            QInstrName::Not => "@not",
        }
    }

    /// The handler for this instruction.
    pub fn handler(self) -> InstrHandler {
        match self {
            QInstrName::Redim => redim,
            QInstrName::Sync => sync,
            QInstrName::Not => not,
        }
    }
}

impl FromStr for QInstrName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QInstrName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or(())
    }
}

/// What a handler sees: the variable's register positions and the literals
/// its arguments resolved to. Quantum literals have already been prepared
/// on the register when the handler runs.
#[derive(Debug, Clone, Copy)]
pub struct InstrArgs<'a> {
    pub slots: &'a [usize],
    pub literals: &'a [Literal],
}

impl InstrArgs<'_> {
    /// Every slot-wide gate takes quantum operands only.
    fn classical_operand(&self) -> bool {
        self.literals.iter().any(|lit| !lit.is_quantum())
    }
}

/// Statements plus the status the translation finished in.
pub type InstrHandler = fn(&InstrArgs<'_>) -> (Vec<String>, InstrStatus);

fn redim(args: &InstrArgs<'_>) -> (Vec<String>, InstrStatus) {
    if args.classical_operand() {
        return (Vec::new(), InstrStatus::Error);
    }
    let code = args.slots.iter().map(|k| format!("h q[{k}];")).collect();
    (code, InstrStatus::Done)
}

fn not(args: &InstrArgs<'_>) -> (Vec<String>, InstrStatus) {
    if args.classical_operand() {
        return (Vec::new(), InstrStatus::Error);
    }
    let code = args.slots.iter().map(|k| format!("x q[{k}];")).collect();
    (code, InstrStatus::Done)
}

fn sync(args: &InstrArgs<'_>) -> (Vec<String>, InstrStatus) {
    let [first, rest @ ..] = args.slots else {
        return (Vec::new(), InstrStatus::Error);
    };
    if rest.is_empty() || args.classical_operand() {
        return (Vec::new(), InstrStatus::Error);
    }
    let code = rest
        .iter()
        .map(|k| format!("cx q[{first}], q[{k}];"))
        .collect();
    (code, InstrStatus::Done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hhat_ir::{CoreLiteral, Value};

    fn run(name: QInstrName, slots: &[usize]) -> (Vec<String>, InstrStatus) {
        name.handler()(&InstrArgs {
            slots,
            literals: &[],
        })
    }

    #[test]
    fn test_names_round_trip() {
        for name in QInstrName::ALL {
            assert_eq!(name.as_str().parse::<QInstrName>(), Ok(name));
        }
        assert!("@measure".parse::<QInstrName>().is_err());
        assert!("redim".parse::<QInstrName>().is_err());
    }

    #[test]
    fn test_redim_and_not() {
        let (code, status) = run(QInstrName::Redim, &[0, 1]);
        assert_eq!(code, vec!["h q[0];", "h q[1];"]);
        assert_eq!(status, InstrStatus::Done);

        let (code, _) = run(QInstrName::Not, &[0]);
        assert_eq!(code, vec!["x q[0];"]);
    }

    #[test]
    fn test_sync() {
        let (code, status) = run(QInstrName::Sync, &[0, 1, 2]);
        assert_eq!(code, vec!["cx q[0], q[1];", "cx q[0], q[2];"]);
        assert_eq!(status, InstrStatus::Done);

        assert_eq!(run(QInstrName::Sync, &[0]).1, InstrStatus::Error);
        assert_eq!(run(QInstrName::Sync, &[]).1, InstrStatus::Error);
    }

    #[test]
    fn test_classical_operands_rejected() {
        let quantum = [Literal::from(CoreLiteral::quantum(1, "@u2"))];
        let classical = [Literal::core(Value::UInt(1), "u8")];

        for name in QInstrName::ALL {
            let ok = name.handler()(&InstrArgs {
                slots: &[0, 1],
                literals: &quantum,
            });
            assert_eq!(ok.1, InstrStatus::Done, "{}", name.as_str());

            let (code, status) = name.handler()(&InstrArgs {
                slots: &[0, 1],
                literals: &classical,
            });
            assert!(code.is_empty());
            assert_eq!(status, InstrStatus::Error, "{}", name.as_str());
        }
    }
}
