//! Per-type shaping of resolver output.
//!
//! A resolver produces either a number (the weighted average) or a
//! bitstring (the highest or lowest count). A [`TypeSpec`] turns that into a
//! [`Value`] of the target type's family; range checks against the exact
//! target happen afterwards, in the classical conversion.

use hhat_ir::Value;
use hhat_types::FullName;
use hhat_types::builtin::{BOOL, CHAR, FLOAT, INT, STR, U8, U16, U32, U64};

/// How a resolved number or bitstring becomes a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeSpec {
    /// Rounded to the nearest integer.
    Int,
    /// Kept as is.
    Float,
    /// Rounded, then read as a Unicode code point.
    Char,
    /// Non-zero is `true`.
    Bool,
    /// The bitstring itself.
    Bitstring,
}

impl TypeSpec {
    /// Spec for a classical builtin type. Quantum and user types have none.
    pub fn for_type(name: &FullName) -> Option<Self> {
        if !name.namespace().is_root() {
            return None;
        }
        match name.name() {
            INT | U8 | U16 | U32 | U64 => Some(TypeSpec::Int),
            FLOAT => Some(TypeSpec::Float),
            CHAR => Some(TypeSpec::Char),
            BOOL => Some(TypeSpec::Bool),
            STR => Some(TypeSpec::Bitstring),
            _ => None,
        }
    }

    /// Shape a weighted average.
    pub fn from_number(self, x: f64) -> Option<Value> {
        if !x.is_finite() {
            return None;
        }
        let rounded = x.round();
        match self {
            TypeSpec::Float => Some(Value::Float(x)),
            TypeSpec::Int => {
                if rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
                    return None;
                }
                Some(Value::Int(rounded as i64))
            }
            TypeSpec::Char => {
                if rounded < 0.0 || rounded > f64::from(u32::MAX) {
                    return None;
                }
                char::from_u32(rounded as u32).map(Value::Char)
            }
            TypeSpec::Bool => Some(Value::Bool(rounded != 0.0)),
            TypeSpec::Bitstring => {
                if rounded < 0.0 || rounded >= u64::MAX as f64 {
                    return None;
                }
                Some(Value::Str(format!("{:b}", rounded as u64)))
            }
        }
    }

    /// Shape a measured bitstring, read as an unsigned binary number.
    pub fn from_bitstring(self, bits: &str) -> Option<Value> {
        if self == TypeSpec::Bitstring {
            return Some(Value::Str(bits.to_string()));
        }
        let n = u64::from_str_radix(bits, 2).ok()?;
        match self {
            TypeSpec::Int => Some(Value::UInt(n)),
            TypeSpec::Float => Some(Value::Float(n as f64)),
            TypeSpec::Char => u32::try_from(n).ok().and_then(char::from_u32).map(Value::Char),
            TypeSpec::Bool => Some(Value::Bool(n != 0)),
            TypeSpec::Bitstring => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_type() {
        assert_eq!(TypeSpec::for_type(&FullName::local("u8")), Some(TypeSpec::Int));
        assert_eq!(TypeSpec::for_type(&FullName::local("char")), Some(TypeSpec::Char));
        assert_eq!(TypeSpec::for_type(&FullName::local("str")), Some(TypeSpec::Bitstring));
        assert_eq!(TypeSpec::for_type(&FullName::local("@u2")), None);
        assert_eq!(TypeSpec::for_type(&FullName::local("point")), None);
    }

    #[test]
    fn test_from_number() {
        assert_eq!(TypeSpec::Int.from_number(47.6), Some(Value::Int(48)));
        assert_eq!(TypeSpec::Float.from_number(0.25), Some(Value::Float(0.25)));
        assert_eq!(TypeSpec::Char.from_number(48.0), Some(Value::Char('0')));
        assert_eq!(TypeSpec::Bool.from_number(0.2), Some(Value::Bool(false)));
        assert_eq!(TypeSpec::Bitstring.from_number(5.0), Some(Value::Str("101".into())));
        assert_eq!(TypeSpec::Char.from_number(-1.0), None);
        assert_eq!(TypeSpec::Int.from_number(f64::NAN), None);
    }

    #[test]
    fn test_from_bitstring() {
        assert_eq!(TypeSpec::Int.from_bitstring("11"), Some(Value::UInt(3)));
        assert_eq!(TypeSpec::Bool.from_bitstring("00"), Some(Value::Bool(false)));
        assert_eq!(TypeSpec::Char.from_bitstring("1000001"), Some(Value::Char('A')));
        assert_eq!(TypeSpec::Bitstring.from_bitstring("01"), Some(Value::Str("01".into())));
        assert_eq!(TypeSpec::Int.from_bitstring("2"), None);
    }
}
