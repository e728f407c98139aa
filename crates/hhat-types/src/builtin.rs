//! Builtin data types.
//!
//! | Type | Size | QSize |
//! |------|------|-------|
//! | `null` | 0 | - |
//! | `bool`, `u8`, `char` | 8 | - |
//! | `u16`, `u32`, `u64` | 16, 32, 64 | - |
//! | `int`, `float` | 64 | - |
//! | `str` | unsized | - |
//! | `@bool` | 1 | (1, 1) |
//! | `@u2`, `@u3`, `@u4` | 2, 3, 4 | (n, n) |
//!
//! A quantum builtin's classical size is the number of bits its measurement
//! yields, which equals its index count.

use crate::datatype::DataType;
use crate::name::FullName;
use crate::size::{QSize, Size};

pub const NULL: &str = "null";
pub const BOOL: &str = "bool";
pub const U8: &str = "u8";
pub const CHAR: &str = "char";
pub const U16: &str = "u16";
pub const U32: &str = "u32";
pub const U64: &str = "u64";
pub const INT: &str = "int";
pub const FLOAT: &str = "float";
pub const STR: &str = "str";

pub const Q_BOOL: &str = "@bool";
pub const Q_U2: &str = "@u2";
pub const Q_U3: &str = "@u3";
pub const Q_U4: &str = "@u4";

const CLASSICAL: &[(&str, Option<u32>)] = &[
    (NULL, Some(0)),
    (BOOL, Some(8)),
    (U8, Some(8)),
    (CHAR, Some(8)),
    (U16, Some(16)),
    (U32, Some(32)),
    (U64, Some(64)),
    (INT, Some(64)),
    (FLOAT, Some(64)),
    (STR, None),
];

const QUANTUM: &[(&str, u32)] = &[(Q_BOOL, 1), (Q_U2, 2), (Q_U3, 3), (Q_U4, 4)];

/// All builtin types, classical first.
pub fn builtin_types() -> Vec<DataType> {
    let classical = CLASSICAL.iter().map(|&(name, bits)| {
        let size = bits.map_or_else(Size::unset, Size::fixed);
        DataType::builtin(FullName::local(name), size, QSize::empty())
    });
    let quantum = QUANTUM.iter().map(|&(name, n)| {
        DataType::builtin(FullName::local(name), Size::fixed(n), QSize::fixed(n))
    });
    classical.chain(quantum).collect()
}

/// Whether `name` is one of the builtin type names.
pub fn is_builtin_name(name: &str) -> bool {
    CLASSICAL.iter().any(|&(n, _)| n == name) || QUANTUM.iter().any(|&(n, _)| n == name)
}

/// Index count of a quantum builtin, if `name` is one.
pub fn quantum_width(name: &str) -> Option<u32> {
    QUANTUM.iter().find(|&&(n, _)| n == name).map(|&(_, w)| w)
}
