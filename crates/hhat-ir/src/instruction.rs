//! Instructions and their arguments.

use serde::{Deserialize, Serialize};
use std::fmt;

use hhat_types::FullName;

use crate::literal::{CoreLiteral, Literal};

/// What an instruction does in the enclosing block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrFlag {
    Assign,
    Declare,
    DeclareAssign,
    Call,
    ControlFlow,
    TestCond,
    Loop,
    LoopCond,
    Return,
}

/// One instruction argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArgIR {
    Literal(Literal),
    Symbol(FullName),
    Instr(Box<InstrIR>),
}

impl From<Literal> for ArgIR {
    fn from(lit: Literal) -> Self {
        ArgIR::Literal(lit)
    }
}

impl From<CoreLiteral> for ArgIR {
    fn from(lit: CoreLiteral) -> Self {
        ArgIR::Literal(Literal::Core(lit))
    }
}

impl From<FullName> for ArgIR {
    fn from(name: FullName) -> Self {
        ArgIR::Symbol(name)
    }
}

impl From<InstrIR> for ArgIR {
    fn from(instr: InstrIR) -> Self {
        ArgIR::Instr(Box::new(instr))
    }
}

impl fmt::Display for ArgIR {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgIR::Literal(lit) => write!(f, "{lit}"),
            ArgIR::Symbol(name) => write!(f, "{name}"),
            ArgIR::Instr(instr) => write!(f, "{instr}"),
        }
    }
}

/// Ordered instruction arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArgsIR(Vec<ArgIR>);

impl ArgsIR {
    pub fn new(args: Vec<ArgIR>) -> Self {
        Self(args)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArgIR> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&ArgIR> {
        self.0.get(i)
    }
}

impl FromIterator<ArgIR> for ArgsIR {
    fn from_iter<I: IntoIterator<Item = ArgIR>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ArgsIR {
    type Item = &'a ArgIR;
    type IntoIter = std::slice::Iter<'a, ArgIR>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A single IR instruction: `(name, args, flag)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrIR {
    name: FullName,
    args: ArgsIR,
    flag: InstrFlag,
}

impl InstrIR {
    pub fn new(name: impl Into<FullName>, args: ArgsIR, flag: InstrFlag) -> Self {
        Self {
            name: name.into(),
            args,
            flag,
        }
    }

    /// A call instruction, the common case for quantum operations.
    pub fn call(name: impl Into<FullName>, args: impl IntoIterator<Item = ArgIR>) -> Self {
        Self::new(name, args.into_iter().collect(), InstrFlag::Call)
    }

    pub fn name(&self) -> &FullName {
        &self.name
    }

    pub fn args(&self) -> &ArgsIR {
        &self.args
    }

    pub fn flag(&self) -> InstrFlag {
        self.flag
    }

    /// Whether the instruction name carries the quantum sigil.
    pub fn is_quantum(&self) -> bool {
        self.name.is_quantum()
    }
}

impl fmt::Display for InstrIR {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<_> = self.args.iter().map(ToString::to_string).collect();
        write!(f, "{}({})", self.name, args.join(", "))
    }
}
