//! Side-by-side comparison of named materials.
//!
//! Unlike a recommendation, a comparison keeps every requested material that
//! exists in the catalog, including those the feasibility filter would drop.
//! Indices are relative to the compared set, not the whole catalog.

use serde::{Deserialize, Serialize};

use ecopack_catalog::Material;
use ecopack_core::MaterialId;
use ecopack_products::ProductSpec;

use crate::error::EngineError;
use crate::feasibility;
use crate::features::{self, ConstraintFlags};
use crate::prediction::{self, PredictionPair, Predictor};
use crate::ranking::{RecommendationEngine, ScoredCandidate};
use crate::scoring::{self, ResolvedWeights};

/// Most materials a single comparison accepts.
pub const MAX_COMPARED: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateComparison {
    /// Higher ranking score; the first candidate wins ties.
    pub preferred: MaterialId,
    /// `first - second`.
    pub ranking_delta: f64,
    pub cost_delta: f64,
    pub co2_delta: f64,
    pub summary: Vec<String>,
}

/// One requested material with its standing against the product's hard bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparedMaterial {
    pub candidate: ScoredCandidate,
    pub within_budget: bool,
    pub within_co2_threshold: bool,
    /// Would be ranked by a recommendation for the same product.
    pub feasible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialComparison {
    /// Request order.
    pub materials: Vec<ComparedMaterial>,
    /// Requested ids not present in the catalog.
    pub missing: Vec<MaterialId>,
    pub co2_threshold: Option<f64>,
    pub weights: ResolvedWeights,
    /// Highest ranking score; earliest in request order on ties.
    pub preferred: Option<MaterialId>,
    /// The first two materials found, in request order.
    pub head_to_head: Option<CandidateComparison>,
    pub summary: Vec<String>,
}

impl<P: Predictor> RecommendationEngine<P> {
    /// Score the requested materials for one product.
    ///
    /// Takes 2 to [`MAX_COMPARED`] distinct ids. Unknown ids are reported in
    /// `missing` rather than failing the call.
    pub fn compare(
        &self,
        product: &ProductSpec,
        catalog: &[Material],
        ids: &[MaterialId],
    ) -> Result<MaterialComparison, EngineError> {
        product.validate()?;
        if ids.len() < 2 {
            return Err(EngineError::validation("compare needs at least 2 materials"));
        }
        if ids.len() > MAX_COMPARED {
            return Err(EngineError::validation(format!(
                "compare accepts at most {MAX_COMPARED} materials"
            )));
        }
        if let Some(dup) = ids.iter().enumerate().find(|(i, id)| ids[..*i].contains(*id)) {
            return Err(EngineError::validation(format!(
                "material '{}' requested twice",
                dup.1
            )));
        }

        let weights =
            ResolvedWeights::resolve(product.weights.as_ref(), self.config().default_weights);

        let mut found = Vec::with_capacity(ids.len());
        let mut missing = Vec::new();
        for id in ids {
            match catalog.iter().position(|m| &m.id == id) {
                Some(i) => found.push(i),
                None => missing.push(id.clone()),
            }
        }
        if found.is_empty() {
            return Ok(MaterialComparison::assemble(
                Vec::new(),
                missing,
                None,
                weights,
                product.max_budget,
            ));
        }

        // The CO₂ cutoff is a catalog-wide statistic, so predict everything.
        let records = features::derive_records(product, catalog);
        let predictions = prediction::predict_pairs(self.predictor(), &records)?;
        let feasible =
            feasibility::filter(&predictions, product.max_budget, self.config().co2_threshold);
        let co2_threshold = feasible.co2_threshold();
        let survivors = feasible.indices();

        let compared: Vec<PredictionPair> = found.iter().map(|&i| predictions[i]).collect();
        let flags: Vec<ConstraintFlags> = found.iter().map(|&i| records[i].flags()).collect();
        let scores = scoring::score_candidates(&compared, &flags, &weights);

        let materials = found
            .iter()
            .zip(scores)
            .zip(&flags)
            .map(|((&i, s), &f)| {
                let p = predictions[i];
                ComparedMaterial {
                    candidate: ScoredCandidate::build(&records[i], &catalog[i], p, f, &s),
                    within_budget: p.cost <= product.max_budget,
                    within_co2_threshold: co2_threshold.is_none_or(|t| p.co2 <= t),
                    feasible: survivors.contains(&i),
                }
            })
            .collect();

        Ok(MaterialComparison::assemble(
            materials,
            missing,
            co2_threshold,
            weights,
            product.max_budget,
        ))
    }
}

impl MaterialComparison {
    fn assemble(
        materials: Vec<ComparedMaterial>,
        missing: Vec<MaterialId>,
        co2_threshold: Option<f64>,
        weights: ResolvedWeights,
        max_budget: f64,
    ) -> Self {
        let best = materials.iter().fold(None::<&ComparedMaterial>, |best, m| match best {
            Some(b) if b.candidate.ranking_score >= m.candidate.ranking_score => Some(b),
            _ => Some(m),
        });
        let head_to_head = match materials.as_slice() {
            [a, b, ..] => Some(compare_candidates(&a.candidate, &b.candidate)),
            _ => None,
        };

        let mut summary = Vec::new();
        if let Some(best) = best {
            summary.push(format!(
                "{} scores highest ({:.1}).",
                best.candidate.material_name, best.candidate.ranking_score
            ));
        }
        for m in &materials {
            let c = &m.candidate;
            if !m.within_budget {
                summary.push(format!(
                    "{} is over budget ({:.2} > {:.2} USD/unit).",
                    c.material_name, c.prediction.cost, max_budget
                ));
            }
            if let (false, Some(t)) = (m.within_co2_threshold, co2_threshold) {
                summary.push(format!(
                    "{} exceeds the CO₂ cutoff ({:.2} > {:.2} kg/unit).",
                    c.material_name, c.prediction.co2, t
                ));
            }
            if c.flags.any() {
                summary.push(format!(
                    "{} falls short on {}.",
                    c.material_name,
                    shortfalls(&c.flags).join(", ")
                ));
            }
        }
        for id in &missing {
            summary.push(format!("{id} is not in the catalog."));
        }

        Self {
            preferred: best.map(|m| m.candidate.material_id.clone()),
            materials,
            missing,
            co2_threshold,
            weights,
            head_to_head,
            summary,
        }
    }
}

fn shortfalls(flags: &ConstraintFlags) -> Vec<&'static str> {
    [
        (flags.strength_insufficient, "strength"),
        (flags.moisture_insufficient, "moisture barrier"),
        (flags.oxygen_insufficient, "oxygen barrier"),
        (flags.over_budget, "material cost"),
    ]
    .into_iter()
    .filter_map(|(hit, name)| hit.then_some(name))
    .collect()
}

pub fn compare_candidates(
    first: &ScoredCandidate,
    second: &ScoredCandidate,
) -> CandidateComparison {
    let ranking_delta = first.ranking_score - second.ranking_score;
    let cost_delta = first.prediction.cost - second.prediction.cost;
    let co2_delta = first.prediction.co2 - second.prediction.co2;

    let (winner, loser) = if ranking_delta >= 0.0 {
        (first, second)
    } else {
        (second, first)
    };

    let mut summary = Vec::with_capacity(5);
    if ranking_delta == 0.0 {
        summary.push(format!(
            "{} and {} rank equally ({:.1}).",
            first.material_name, second.material_name, first.ranking_score
        ));
    } else {
        summary.push(format!(
            "{} ranks above {} ({:.1} vs {:.1}).",
            winner.material_name, loser.material_name, winner.ranking_score, loser.ranking_score
        ));
    }

    if cost_delta != 0.0 {
        let cheaper = if cost_delta < 0.0 { first } else { second };
        summary.push(format!(
            "{} is cheaper by {:.2} USD/unit.",
            cheaper.material_name,
            cost_delta.abs()
        ));
    }
    if co2_delta != 0.0 {
        let cleaner = if co2_delta < 0.0 { first } else { second };
        summary.push(format!(
            "{} emits {:.2} kg CO₂/unit less.",
            cleaner.material_name,
            co2_delta.abs()
        ));
    }

    for c in [first, second] {
        summary.push(format!(
            "Reasons for {}: {}.",
            c.material_name,
            c.reason.trim_end_matches('.')
        ));
    }

    CandidateComparison {
        preferred: winner.material_id.clone(),
        ranking_delta,
        cost_delta,
        co2_delta,
        summary,
    }
}
