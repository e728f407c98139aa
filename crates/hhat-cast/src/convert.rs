//! Conversions that need no backend.

use hhat_ir::{CoreLiteral, Value};
use hhat_types::FullName;
use hhat_types::builtin::{BOOL, CHAR, FLOAT, INT, STR, U8, U16, U32, U64};

use crate::error::{CastError, CastResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Bool,
    Unsigned(u32),
    Int,
    Float,
    Char,
    Str,
}

impl Target {
    fn of(name: &FullName) -> Option<Self> {
        if !name.namespace().is_root() {
            return None;
        }
        match name.name() {
            BOOL => Some(Target::Bool),
            U8 => Some(Target::Unsigned(8)),
            U16 => Some(Target::Unsigned(16)),
            U32 => Some(Target::Unsigned(32)),
            U64 => Some(Target::Unsigned(64)),
            INT => Some(Target::Int),
            FLOAT => Some(Target::Float),
            CHAR => Some(Target::Char),
            STR => Some(Target::Str),
            _ => None,
        }
    }
}

fn max_for_width(width: u32) -> u64 {
    if width >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

fn unsupported(value: &Value, target: &FullName, reason: &str) -> CastError {
    CastError::UnsupportedConversion {
        value: value.to_string(),
        target: target.clone(),
        reason: reason.to_string(),
    }
}

/// Non-negative integer content of `value`.
fn as_unsigned(value: &Value, target: &FullName) -> CastResult<u64> {
    match value {
        Value::UInt(u) => Ok(*u),
        Value::Int(i) => u64::try_from(*i).map_err(|_| CastError::NegToUnsigned {
            value: *i,
            target: target.clone(),
        }),
        Value::Bool(b) => Ok(u64::from(*b)),
        Value::Char(c) => Ok(u64::from(u32::from(*c))),
        Value::Float(_) => Err(unsupported(value, target, "floats are not truncated")),
        Value::Null | Value::Str(_) => Err(unsupported(value, target, "not a number")),
    }
}

fn bounded(value: &Value, target: &FullName, max: u64) -> CastResult<u64> {
    let n = as_unsigned(value, target)?;
    if n > max {
        return Err(CastError::IntOverflow {
            value: n.to_string(),
            target: target.clone(),
            max,
        });
    }
    Ok(n)
}

/// Convert a classical value to the classical builtin `target`.
pub fn to_classical(value: &Value, target: &FullName) -> CastResult<Value> {
    let Some(kind) = Target::of(target) else {
        return Err(unsupported(value, target, "target is not a classical builtin"));
    };

    match kind {
        Target::Bool => match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            _ => bounded(value, target, 1).map(|n| Value::Bool(n == 1)),
        },
        Target::Unsigned(width) => bounded(value, target, max_for_width(width)).map(Value::UInt),
        Target::Int => match value {
            Value::Int(i) => Ok(Value::Int(*i)),
            _ => {
                let max = i64::MAX as u64;
                bounded(value, target, max).map(|n| Value::Int(n as i64))
            }
        },
        Target::Float => match value {
            Value::Float(f) => Ok(Value::Float(*f)),
            Value::Int(i) => Ok(Value::Float(*i as f64)),
            Value::UInt(u) => Ok(Value::Float(*u as f64)),
            _ => Err(unsupported(value, target, "not a number")),
        },
        Target::Char => match value {
            Value::Char(c) => Ok(Value::Char(*c)),
            Value::Int(_) | Value::UInt(_) => {
                let code = bounded(value, target, u64::from(u32::MAX))?;
                u32::try_from(code)
                    .ok()
                    .and_then(char::from_u32)
                    .map(Value::Char)
                    .ok_or_else(|| unsupported(value, target, "not a Unicode scalar value"))
            }
            _ => Err(unsupported(value, target, "no code point")),
        },
        Target::Str => match value {
            Value::Str(s) => Ok(Value::Str(s.clone())),
            Value::Char(c) => Ok(Value::Str(c.to_string())),
            other => Ok(Value::Str(other.to_string())),
        },
    }
}

/// Encode a classical value as a basis state of the quantum type `target`,
/// which spans `width` indices.
pub fn to_quantum(value: &Value, target: &FullName, width: u32) -> CastResult<CoreLiteral> {
    let bits = bounded(value, target, max_for_width(width))?;
    Ok(CoreLiteral::quantum(bits, target.clone()))
}
