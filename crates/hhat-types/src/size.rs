//! Classical bit sizes and quantum index sizes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

use crate::error::{TypeError, TypeResult};

/// Classical bit width of a type.
///
/// A `Size` is written at most once. Layout must not change after first use,
/// so a second [`Size::add_size`] fails even when the value is the same.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    bits: Option<u32>,
}

impl Size {
    /// An unset size.
    pub fn unset() -> Self {
        Self { bits: None }
    }

    /// A size fixed at `bits`.
    pub fn fixed(bits: u32) -> Self {
        Self { bits: Some(bits) }
    }

    /// The bit width, if set.
    pub fn bits(&self) -> Option<u32> {
        self.bits
    }

    /// Whether a width has been recorded.
    pub fn is_set(&self) -> bool {
        self.bits.is_some()
    }

    /// Record the bit width.
    pub fn add_size(&mut self, bits: u32) -> TypeResult<u32> {
        match self.bits {
            Some(current) => Err(TypeError::SizeAlreadySet {
                current,
                requested: bits,
            }),
            None => {
                self.bits = Some(bits);
                Ok(bits)
            }
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bits {
            Some(bits) => write!(f, "{bits} bits"),
            None => write!(f, "unsized"),
        }
    }
}

/// Minimum and maximum number of quantum indices a type requires.
///
/// `max` is undefined until the first finite value is supplied; from then on
/// it only grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QSize {
    min: u32,
    max: Option<u32>,
}

impl QSize {
    /// `QSize(0, undefined)`, the size of a purely classical type.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A type requiring exactly `n` indices.
    pub fn fixed(n: u32) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    /// Create from explicit bounds.
    pub fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> Option<u32> {
        self.max
    }

    /// Raise the minimum by `n`.
    pub fn inc_min(&mut self, n: u32) -> &mut Self {
        self.min += n;
        self
    }

    /// Raise the maximum by `n`. An undefined `n` leaves `max` untouched.
    pub fn inc_max(&mut self, n: Option<u32>) -> &mut Self {
        if let Some(n) = n {
            self.max = Some(self.max.unwrap_or(0) + n);
        }
        self
    }

    /// Whether the type needs any quantum index at all.
    pub fn is_quantum(&self) -> bool {
        self.min > 0 || self.max.is_some_and(|m| m > 0)
    }
}

impl Add for QSize {
    type Output = QSize;

    fn add(mut self, rhs: QSize) -> QSize {
        self.inc_min(rhs.min).inc_max(rhs.max);
        self
    }
}

impl fmt::Display for QSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "QSize({}, {})", self.min, max),
            None => write!(f, "QSize({}, _)", self.min),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_write_once() {
        let mut size = Size::unset();
        assert_eq!(size.add_size(8), Ok(8));
        assert_eq!(
            size.add_size(8),
            Err(TypeError::SizeAlreadySet {
                current: 8,
                requested: 8
            })
        );
        assert!(size.add_size(16).is_err());
        assert_eq!(size.bits(), Some(8));
    }

    #[test]
    fn test_fixed_size_rejects_write() {
        let mut size = Size::fixed(64);
        assert!(size.add_size(32).is_err());
    }

    #[test]
    fn test_qsize_max_defined_on_first_finite_value() {
        let mut q = QSize::empty();
        q.inc_max(None);
        assert_eq!(q.max(), None);
        q.inc_max(Some(2));
        assert_eq!(q.max(), Some(2));
        q.inc_max(Some(3)).inc_min(4);
        assert_eq!(q, QSize::new(4, Some(5)));
    }

    #[test]
    fn test_qsize_pointwise_sum() {
        assert_eq!(QSize::fixed(1) + QSize::fixed(1), QSize::fixed(2));
        assert_eq!(QSize::fixed(3) + QSize::empty(), QSize::fixed(3));
        assert_eq!(QSize::empty() + QSize::empty(), QSize::empty());
        assert!(!QSize::empty().is_quantum());
    }
}
