//! Reduction of measurement counts to one value.
//!
//! | Resolver | Output |
//! |----------|--------|
//! | [`RawValue`] | the counts, unchanged |
//! | [`WeightedAverageValue`] | count-weighted mean of each bitstring's ordinal, through the spec |
//! | [`HighestValue`] | most frequent bitstring, through the spec |
//! | [`LowestValue`] | least frequent bitstring, through the spec |
//!
//! Ties in [`HighestValue`] and [`LowestValue`] go to the lexicographically
//! smallest bitstring. A bitstring's ordinal is the sum of its characters'
//! code points, so `"0"` is 48 and `"01"` is 97.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use hhat_hal::Counts;
use hhat_ir::Value;

use crate::spec::TypeSpec;

/// What a resolver produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// The full distribution.
    Distribution(Counts),
    /// A single value.
    Value(Value),
}

/// Why a resolver produced nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no measurement outcomes")]
    Empty,

    /// The spec cannot represent the reduced outcome.
    #[error("outcome '{outcome}' has no {spec:?} value")]
    Unrepresentable { outcome: String, spec: TypeSpec },
}

/// A side-effect-free reduction policy over counts.
pub trait Resolver: fmt::Debug + Send + Sync {
    fn resolve(&self, counts: &Counts, spec: TypeSpec) -> Result<Resolved, ResolveError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RawValue;

impl Resolver for RawValue {
    fn resolve(&self, counts: &Counts, _spec: TypeSpec) -> Result<Resolved, ResolveError> {
        Ok(Resolved::Distribution(counts.clone()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedAverageValue;

fn ordinal(bitstring: &str) -> f64 {
    bitstring.chars().map(|c| f64::from(u32::from(c))).sum()
}

impl Resolver for WeightedAverageValue {
    fn resolve(&self, counts: &Counts, spec: TypeSpec) -> Result<Resolved, ResolveError> {
        let total = counts.total();
        if total == 0 {
            return Err(ResolveError::Empty);
        }
        let total = total as f64;
        let average: f64 = counts
            .iter()
            .map(|(k, v)| (v as f64 / total) * ordinal(k))
            .sum();
        spec.from_number(average)
            .map(Resolved::Value)
            .ok_or_else(|| ResolveError::Unrepresentable {
                outcome: average.to_string(),
                spec,
            })
    }
}

fn shape(bitstring: &str, spec: TypeSpec) -> Result<Resolved, ResolveError> {
    spec.from_bitstring(bitstring)
        .map(Resolved::Value)
        .ok_or_else(|| ResolveError::Unrepresentable {
            outcome: bitstring.to_string(),
            spec,
        })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HighestValue;

impl Resolver for HighestValue {
    fn resolve(&self, counts: &Counts, spec: TypeSpec) -> Result<Resolved, ResolveError> {
        let (bitstring, _) = counts.most_frequent().ok_or(ResolveError::Empty)?;
        shape(bitstring, spec)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LowestValue;

impl Resolver for LowestValue {
    fn resolve(&self, counts: &Counts, spec: TypeSpec) -> Result<Resolved, ResolveError> {
        let (bitstring, _) = counts.least_frequent().ok_or(ResolveError::Empty)?;
        shape(bitstring, spec)
    }
}

/// Resolver choice as named in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolverKind {
    Raw,
    WeightedAverage,
    #[default]
    Highest,
    Lowest,
}

impl ResolverKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolverKind::Raw => "raw",
            ResolverKind::WeightedAverage => "weighted_average",
            ResolverKind::Highest => "highest",
            ResolverKind::Lowest => "lowest",
        }
    }
}

impl fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResolverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(ResolverKind::Raw),
            "weighted_average" => Ok(ResolverKind::WeightedAverage),
            "highest" => Ok(ResolverKind::Highest),
            "lowest" => Ok(ResolverKind::Lowest),
            other => Err(format!("unknown resolver '{other}'")),
        }
    }
}

impl Resolver for ResolverKind {
    fn resolve(&self, counts: &Counts, spec: TypeSpec) -> Result<Resolved, ResolveError> {
        match self {
            ResolverKind::Raw => RawValue.resolve(counts, spec),
            ResolverKind::WeightedAverage => WeightedAverageValue.resolve(counts, spec),
            ResolverKind::Highest => HighestValue.resolve(counts, spec),
            ResolverKind::Lowest => LowestValue.resolve(counts, spec),
        }
    }
}
