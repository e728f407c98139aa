//! Shot estimation policies.
//!
//! The number of shots used to build a measurement distribution is a
//! heuristic. Policies are interchangeable through [`ShotsEstimator`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Chooses how many shots to run for a program using `num_idxs` indices.
pub trait ShotsEstimator: fmt::Debug + Send + Sync {
    fn estimate(&self, num_idxs: usize) -> u32;
}

/// Linear policy with a steeper regime below a threshold.
///
/// ```text
///   shots = n * per_index_low                    if n <= threshold
///   shots = n * per_index_high + offset_high     otherwise
/// ```
///
/// The defaults give 1000 shots per index up to 12 indices, then
/// `550 n + 12000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearShotsEstimator {
    #[serde(default = "default_threshold")]
    pub threshold: u32,
    #[serde(default = "default_per_index_low")]
    pub per_index_low: u32,
    #[serde(default = "default_per_index_high")]
    pub per_index_high: u32,
    #[serde(default = "default_offset_high")]
    pub offset_high: u32,
}

fn default_threshold() -> u32 {
    12
}

fn default_per_index_low() -> u32 {
    1_000
}

fn default_per_index_high() -> u32 {
    550
}

fn default_offset_high() -> u32 {
    12_000
}

impl Default for LinearShotsEstimator {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            per_index_low: default_per_index_low(),
            per_index_high: default_per_index_high(),
            offset_high: default_offset_high(),
        }
    }
}

impl ShotsEstimator for LinearShotsEstimator {
    fn estimate(&self, num_idxs: usize) -> u32 {
        let n = u32::try_from(num_idxs).unwrap_or(u32::MAX);
        if n <= self.threshold {
            n.saturating_mul(self.per_index_low)
        } else {
            n.saturating_mul(self.per_index_high)
                .saturating_add(self.offset_high)
        }
    }
}

/// Always the same number of shots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedShots(pub u32);

impl ShotsEstimator for FixedShots {
    fn estimate(&self, _num_idxs: usize) -> u32 {
        self.0
    }
}

/// Serializable choice of policy, as read from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ShotsPolicy {
    Linear(LinearShotsEstimator),
    Fixed { shots: u32 },
}

impl Default for ShotsPolicy {
    fn default() -> Self {
        ShotsPolicy::Linear(LinearShotsEstimator::default())
    }
}

impl ShotsEstimator for ShotsPolicy {
    fn estimate(&self, num_idxs: usize) -> u32 {
        match self {
            ShotsPolicy::Linear(linear) => linear.estimate(num_idxs),
            ShotsPolicy::Fixed { shots } => FixedShots(*shots).estimate(num_idxs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_default() {
        let est = LinearShotsEstimator::default();
        assert_eq!(est.estimate(1), 1_000);
        assert_eq!(est.estimate(2), 2_000);
        assert_eq!(est.estimate(12), 12_000);
        assert_eq!(est.estimate(13), 13 * 550 + 12_000);
        assert_eq!(est.estimate(20), 23_000);
    }

    #[test]
    fn test_fixed() {
        assert_eq!(FixedShots(256).estimate(30), 256);
    }

    #[test]
    fn test_policy_from_json() {
        let policy: ShotsPolicy = serde_json::from_str(r#"{"policy":"fixed","shots":64}"#).unwrap();
        assert_eq!(policy.estimate(3), 64);

        let policy: ShotsPolicy =
            serde_json::from_str(r#"{"policy":"linear","threshold":2}"#).unwrap();
        assert_eq!(policy.estimate(2), 2_000);
        assert_eq!(policy.estimate(3), 3 * 550 + 12_000);
    }
}
