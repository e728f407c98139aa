//! Literal values carried by the IR.

use serde::{Deserialize, Serialize};
use std::fmt;

use hhat_types::{FullName, QUANTUM_SIGIL};

use crate::instruction::ArgIR;

/// A primitive value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Str(String),
}

impl Value {
    /// Bit pattern of the value, when it has one.
    pub fn as_bits(&self) -> Option<u64> {
        match self {
            Value::Null => Some(0),
            Value::Bool(b) => Some(u64::from(*b)),
            Value::UInt(v) => Some(*v),
            Value::Int(v) => u64::try_from(*v).ok(),
            Value::Char(c) => Some(u64::from(u32::from(*c))),
            Value::Float(_) | Value::Str(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Char(c) => write!(f, "'{c}'"),
            Value::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// A value paired with its type.
///
/// A quantum core literal such as `@5` of type `@u3` describes the basis state
/// a quantum variable is prepared in. Its bits are read least significant
/// first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreLiteral {
    value: Value,
    type_name: FullName,
}

impl CoreLiteral {
    pub fn new(value: Value, type_name: impl Into<FullName>) -> Self {
        Self {
            value,
            type_name: type_name.into(),
        }
    }

    /// A quantum literal holding basis state `value`.
    pub fn quantum(value: u64, type_name: impl Into<FullName>) -> Self {
        Self::new(Value::UInt(value), type_name)
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn type_name(&self) -> &FullName {
        &self.type_name
    }

    pub fn is_quantum(&self) -> bool {
        self.type_name.is_quantum()
    }

    /// Bit `i` of the value, least significant first.
    pub fn bit(&self, i: u32) -> Option<bool> {
        let bits = self.value.as_bits()?;
        Some(i < u64::BITS && (bits >> i) & 1 == 1)
    }

    /// Positions of the set bits among the lowest `width` bits.
    pub fn set_bits(&self, width: u32) -> Option<Vec<u32>> {
        let bits = self.value.as_bits()?;
        Some(
            (0..width.min(u64::BITS))
                .filter(|i| (bits >> i) & 1 == 1)
                .collect(),
        )
    }
}

impl fmt::Display for CoreLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_quantum() {
            write!(f, "{QUANTUM_SIGIL}{}", self.value)
        } else {
            write!(f, "{}", self.value)
        }
    }
}

/// Literal kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// One typed primitive value.
    Core(CoreLiteral),
    /// A composite value whose items are all literals.
    Composite {
        type_name: FullName,
        items: Vec<Literal>,
    },
    /// A composite value mixing literals, symbols and nested instructions.
    CompositeMix {
        type_name: FullName,
        items: Vec<ArgIR>,
    },
}

impl Literal {
    pub fn core(value: Value, type_name: impl Into<FullName>) -> Self {
        Literal::Core(CoreLiteral::new(value, type_name))
    }

    pub fn type_name(&self) -> &FullName {
        match self {
            Literal::Core(core) => core.type_name(),
            Literal::Composite { type_name, .. } | Literal::CompositeMix { type_name, .. } => {
                type_name
            }
        }
    }

    pub fn is_quantum(&self) -> bool {
        self.type_name().is_quantum()
    }

    pub fn as_core(&self) -> Option<&CoreLiteral> {
        match self {
            Literal::Core(core) => Some(core),
            _ => None,
        }
    }
}

impl From<CoreLiteral> for Literal {
    fn from(core: CoreLiteral) -> Self {
        Literal::Core(core)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Core(core) => write!(f, "{core}"),
            Literal::Composite { type_name, items } => {
                let items: Vec<_> = items.iter().map(ToString::to_string).collect();
                write!(f, "{type_name}({})", items.join(", "))
            }
            Literal::CompositeMix { type_name, items } => {
                write!(f, "{type_name}(<{} items>)", items.len())
            }
        }
    }
}
