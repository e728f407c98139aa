//! Measurement counts and execution results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{HalError, HalResult};

/// Observed bitstrings and how often each occurred.
///
/// Bitstrings follow the backend's classical-register order: the highest
/// classical bit is the leftmost character. Iteration is lexicographic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts(BTreeMap<String, u64>);

impl Counts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.0.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Occurrences of `bitstring` (zero if never observed).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.0.get(bitstring).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// The bitstring with the highest count; ties go to the lexicographically
    /// smallest bitstring.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        // ascending key order; keep the first maximum
        let mut best: Option<(&str, u64)> = None;
        for (k, v) in self.iter() {
            match best {
                Some((_, bv)) if bv >= v => {}
                _ => best = Some((k, v)),
            }
        }
        best
    }

    /// The bitstring with the lowest count; ties go to the lexicographically
    /// smallest bitstring.
    pub fn least_frequent(&self) -> Option<(&str, u64)> {
        let mut best: Option<(&str, u64)> = None;
        for (k, v) in self.iter() {
            match best {
                Some((_, bv)) if bv <= v => {}
                _ => best = Some((k, v)),
            }
        }
        best
    }

    /// Check that counts are non-empty, share one width, use only `0`/`1`,
    /// and sum to `shots`.
    pub fn validate(&self, shots: u32) -> HalResult<()> {
        let Some(width) = self.0.keys().next().map(String::len) else {
            return Err(HalError::InvalidResult("empty counts".into()));
        };
        if width == 0 {
            return Err(HalError::InvalidResult("empty bitstring".into()));
        }
        for key in self.0.keys() {
            if key.len() != width {
                return Err(HalError::InvalidResult(format!(
                    "bitstring '{key}' has width {}, expected {width}",
                    key.len()
                )));
            }
            if !key.bytes().all(|b| b == b'0' || b == b'1') {
                return Err(HalError::InvalidResult(format!(
                    "bitstring '{key}' is not binary"
                )));
            }
        }
        let total = self.total();
        if total != u64::from(shots) {
            return Err(HalError::InvalidResult(format!(
                "counts sum to {total}, expected {shots} shots"
            )));
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for (k, v) in iter {
            counts.insert(k, v);
        }
        counts
    }
}

/// Result of a completed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub counts: Counts,
    pub shots: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ExecutionResult {
    pub fn new(counts: Counts, shots: u32) -> Self {
        Self {
            counts,
            shots,
            execution_time_ms: None,
        }
    }

    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }

    /// Fraction of shots that produced `bitstring`.
    pub fn probability(&self, bitstring: &str) -> f64 {
        if self.shots == 0 {
            return 0.0;
        }
        self.counts.get(bitstring) as f64 / f64::from(self.shots)
    }
}
