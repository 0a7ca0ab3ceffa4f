//! Feasibility filter: budget + emissions pre-screen.

use serde::{Deserialize, Serialize};

use crate::config::ThresholdPolicy;
use crate::prediction::PredictionPair;

/// Which tier of the filter produced the surviving set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feasibility {
    /// Under budget *and* under the CO₂ threshold.
    Strict,
    /// Nothing passed both checks; budget-only fallback.
    Relaxed,
    /// Nothing is affordable (or the catalog is empty).
    Empty,
}

/// Outcome of the filter: indices into the catalog, in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub enum FeasibleSet {
    Strict {
        indices: Vec<usize>,
        co2_threshold: Option<f64>,
    },
    Relaxed {
        indices: Vec<usize>,
        co2_threshold: Option<f64>,
    },
    Empty {
        co2_threshold: Option<f64>,
    },
}

impl FeasibleSet {
    pub fn indices(&self) -> &[usize] {
        match self {
            FeasibleSet::Strict { indices, .. } | FeasibleSet::Relaxed { indices, .. } => {
                indices.as_slice()
            }
            FeasibleSet::Empty { .. } => &[],
        }
    }

    pub fn feasibility(&self) -> Feasibility {
        match self {
            FeasibleSet::Strict { .. } => Feasibility::Strict,
            FeasibleSet::Relaxed { .. } => Feasibility::Relaxed,
            FeasibleSet::Empty { .. } => Feasibility::Empty,
        }
    }

    /// The CO₂ cutoff that was applied (`None` when the policy is disabled or
    /// there was nothing to derive it from).
    pub fn co2_threshold(&self) -> Option<f64> {
        match self {
            FeasibleSet::Strict { co2_threshold, .. }
            | FeasibleSet::Relaxed { co2_threshold, .. }
            | FeasibleSet::Empty { co2_threshold } => *co2_threshold,
        }
    }
}

impl ThresholdPolicy {
    /// Derive the CO₂ cutoff over *all* predicted values (not just affordable ones).
    pub fn threshold(&self, co2: &[f64]) -> Option<f64> {
        match *self {
            ThresholdPolicy::Disabled => None,
            ThresholdPolicy::Absolute(kg) => Some(kg),
            ThresholdPolicy::Median => quantile(co2, 0.5),
            ThresholdPolicy::Quantile(q) => quantile(co2, q),
        }
    }
}

/// Split materials into the feasible set.
///
/// 1. `cost <= max_budget && co2 <= threshold`
/// 2. if empty: `cost <= max_budget`
/// 3. if still empty: [`FeasibleSet::Empty`]
pub fn filter(
    predictions: &[PredictionPair],
    max_budget: f64,
    policy: ThresholdPolicy,
) -> FeasibleSet {
    let co2: Vec<f64> = predictions.iter().map(|p| p.co2).collect();
    let co2_threshold = policy.threshold(&co2);

    let affordable = |p: &PredictionPair| p.cost <= max_budget;
    let clean = |p: &PredictionPair| co2_threshold.is_none_or(|t| p.co2 <= t);

    let strict: Vec<usize> = predictions
        .iter()
        .enumerate()
        .filter(|(_, p)| affordable(p) && clean(p))
        .map(|(i, _)| i)
        .collect();
    if !strict.is_empty() {
        return FeasibleSet::Strict {
            indices: strict,
            co2_threshold,
        };
    }

    let relaxed: Vec<usize> = predictions
        .iter()
        .enumerate()
        .filter(|(_, p)| affordable(p))
        .map(|(i, _)| i)
        .collect();
    if !relaxed.is_empty() {
        return FeasibleSet::Relaxed {
            indices: relaxed,
            co2_threshold,
        };
    }

    FeasibleSet::Empty { co2_threshold }
}

/// Quantile with linear interpolation between closest ranks.
fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
