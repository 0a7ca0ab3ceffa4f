//! Index & score calculator.
//!
//! All indices are relative to the *feasible* set passed in, not the full catalog.

use serde::{Deserialize, Serialize};

use ecopack_core::ValueObject;
use ecopack_products::WeightOverride;

use crate::config::DefaultWeights;
use crate::features::ConstraintFlags;
use crate::prediction::PredictionPair;

pub const STRENGTH_PENALTY: f64 = 25.0;
pub const MOISTURE_PENALTY: f64 = 20.0;
pub const OXYGEN_PENALTY: f64 = 20.0;
pub const BUDGET_PENALTY: f64 = 25.0;

/// Ranking blend (fixed regardless of caller weights).
pub const RANKING_SUITABILITY_SHARE: f64 = 0.60;
pub const RANKING_CO2_SHARE: f64 = 0.20;
pub const RANKING_COST_SHARE: f64 = 0.20;

/// Ranking scores are reported (and ties decided) at 4 decimal places.
const RANKING_PRECISION: f64 = 10_000.0;

/// Objective weights after clamping/renormalization. `co2 + cost + risk == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedWeights {
    pub co2: f64,
    pub cost: f64,
    pub risk: f64,
}

impl ValueObject for ResolvedWeights {}

impl ResolvedWeights {
    /// Resolve caller weights against the configured defaults.
    ///
    /// - a missing key takes its default
    /// - negative (or non-finite) weights clamp to 0
    /// - `co2 + cost > 1` rescales both proportionally to sum to 1
    /// - `risk = 1 - (co2 + cost)`, clamped at 0 with the others renormalized
    pub fn resolve(requested: Option<&WeightOverride>, defaults: DefaultWeights) -> Self {
        let (co2, cost) = match requested {
            Some(w) => (w.co2.unwrap_or(defaults.co2), w.cost.unwrap_or(defaults.cost)),
            None => (defaults.co2, defaults.cost),
        };
        let mut co2 = non_negative(co2);
        let mut cost = non_negative(cost);

        let total = co2 + cost;
        if total > 1.0 {
            co2 /= total;
            cost /= total;
        }

        let mut risk = 1.0 - (co2 + cost);
        if risk < 0.0 {
            risk = 0.0;
            let total = co2 + cost;
            if total > 0.0 {
                co2 /= total;
                cost /= total;
            }
        }

        Self { co2, cost, risk }
    }

    pub fn sum(&self) -> f64 {
        self.co2 + self.cost + self.risk
    }
}

impl Default for ResolvedWeights {
    fn default() -> Self {
        Self::resolve(None, DefaultWeights::default())
    }
}

/// Per-candidate indices and scores, all within [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateScores {
    pub cost_efficiency_index: f64,
    pub co2_impact_index: f64,
    pub suitability_score: f64,
    pub ranking_score: f64,
}

/// Score the feasible set. `predictions` and `flags` are parallel.
pub fn score_candidates(
    predictions: &[PredictionPair],
    flags: &[ConstraintFlags],
    weights: &ResolvedWeights,
) -> Vec<CandidateScores> {
    let cost: Vec<f64> = predictions.iter().map(|p| p.cost).collect();
    let co2: Vec<f64> = predictions.iter().map(|p| p.co2).collect();
    let cost_index = inverse_index(&cost);
    let co2_index = inverse_index(&co2);

    cost_index
        .into_iter()
        .zip(co2_index)
        .zip(flags)
        .map(|((cost_efficiency_index, co2_impact_index), flags)| {
            let suitability_score =
                suitability(co2_impact_index, cost_efficiency_index, flags, weights);
            CandidateScores {
                cost_efficiency_index,
                co2_impact_index,
                suitability_score,
                ranking_score: ranking(suitability_score, co2_impact_index, cost_efficiency_index),
            }
        })
        .collect()
}

/// `(1 - min_max(values)) * 100`: lower raw value, higher index.
pub fn inverse_index(values: &[f64]) -> Vec<f64> {
    min_max_normalize(values)
        .into_iter()
        .map(|n| clip((1.0 - n) * 100.0))
        .collect()
}

/// Scale to [0, 1]. Zero variance (or nothing usable) maps every member to 0.5.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let (min, max) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if max <= min {
        return vec![0.5; values.len()];
    }

    let span = max - min;
    values
        .iter()
        .map(|&v| {
            if v.is_finite() {
                ((v - min) / span).clamp(0.0, 1.0)
            } else {
                0.5
            }
        })
        .collect()
}

pub fn penalty(flags: &ConstraintFlags) -> f64 {
    let mut p = 0.0;
    if flags.strength_insufficient {
        p += STRENGTH_PENALTY;
    }
    if flags.moisture_insufficient {
        p += MOISTURE_PENALTY;
    }
    if flags.oxygen_insufficient {
        p += OXYGEN_PENALTY;
    }
    if flags.over_budget {
        p += BUDGET_PENALTY;
    }
    p
}

/// `clip(w_co2*co2 + w_cost*cost + w_risk*(100 - 25*strength_insufficient) - penalty)`.
pub fn suitability(
    co2_index: f64,
    cost_index: f64,
    flags: &ConstraintFlags,
    weights: &ResolvedWeights,
) -> f64 {
    let risk_component = if flags.strength_insufficient {
        100.0 - STRENGTH_PENALTY
    } else {
        100.0
    };
    let base = weights.co2 * co2_index + weights.cost * cost_index + weights.risk * risk_component;
    clip(base - penalty(flags))
}

/// Final ordering metric, rounded to the precision ties are decided at.
pub fn ranking(suitability: f64, co2_index: f64, cost_index: f64) -> f64 {
    let raw = RANKING_SUITABILITY_SHARE * suitability
        + RANKING_CO2_SHARE * co2_index
        + RANKING_COST_SHARE * cost_index;
    clip((clip(raw) * RANKING_PRECISION).round() / RANKING_PRECISION)
}

fn clip(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) }
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}
