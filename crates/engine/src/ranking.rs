//! Ranking orchestrator.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use ecopack_catalog::Material;
use ecopack_core::MaterialId;
use ecopack_products::ProductSpec;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::explanation::{Explanation, build_explanation, build_reason};
use crate::feasibility::{self, Feasibility};
use crate::features::{self, ConstraintFlags, InferenceRecord};
use crate::prediction::{self, PredictionPair, Predictor};
use crate::scoring::{self, CandidateScores, ResolvedWeights};

/// One ranked, explained material. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub material_id: MaterialId,
    pub material_name: String,
    pub material_type: String,
    pub prediction: PredictionPair,
    pub flags: ConstraintFlags,
    pub cost_efficiency_index: f64,
    pub co2_impact_index: f64,
    pub suitability_score: f64,
    pub ranking_score: f64,
    pub reason: String,
    pub explanation: Explanation,
    /// Equal to `suitability_score`.
    pub confidence: f64,
}

impl ScoredCandidate {
    pub(crate) fn build(
        record: &InferenceRecord,
        material: &Material,
        prediction: PredictionPair,
        flags: ConstraintFlags,
        scores: &CandidateScores,
    ) -> Self {
        Self {
            material_id: record.material_id.clone(),
            material_name: material.name.clone(),
            material_type: record.material_type.clone(),
            prediction,
            flags,
            cost_efficiency_index: scores.cost_efficiency_index,
            co2_impact_index: scores.co2_impact_index,
            suitability_score: scores.suitability_score,
            ranking_score: scores.ranking_score,
            reason: build_reason(scores, &flags),
            explanation: build_explanation(record, &prediction, scores),
            confidence: scores.suitability_score,
        }
    }
}

/// Product spec plus per-call options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub product: ProductSpec,
    /// Overrides the configured top-N for this call.
    #[serde(default)]
    pub top_n: Option<usize>,
}

impl From<ProductSpec> for RecommendationRequest {
    fn from(product: ProductSpec) -> Self {
        Self {
            product,
            top_n: None,
        }
    }
}

/// Result of a recommendation call.
///
/// An empty `candidates` list is a valid "no feasible material" answer, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationOutcome {
    /// Sorted by `ranking_score` descending; at most top-N entries.
    pub candidates: Vec<ScoredCandidate>,
    pub feasibility: Feasibility,
    pub co2_threshold: Option<f64>,
    pub weights: ResolvedWeights,
    /// Catalog size.
    pub evaluated: usize,
    /// Survivors of the feasibility filter, before truncation.
    pub feasible: usize,
}

impl RecommendationOutcome {
    pub fn best(&self) -> Option<&ScoredCandidate> {
        self.candidates.first()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    fn empty(weights: ResolvedWeights, evaluated: usize, co2_threshold: Option<f64>) -> Self {
        Self {
            candidates: Vec::new(),
            feasibility: Feasibility::Empty,
            co2_threshold,
            weights,
            evaluated,
            feasible: 0,
        }
    }
}

/// Runs the full pipeline against an injected predictor.
///
/// Holds no mutable state; one instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct RecommendationEngine<P> {
    predictor: P,
    config: EngineConfig,
}

impl<P: Predictor> RecommendationEngine<P> {
    pub fn new(predictor: P) -> Self {
        Self::with_config(predictor, EngineConfig::default())
    }

    pub fn with_config(predictor: P, config: EngineConfig) -> Self {
        Self { predictor, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    /// Recommend with the configured top-N.
    pub fn recommend(
        &self,
        product: &ProductSpec,
        catalog: &[Material],
    ) -> Result<RecommendationOutcome, EngineError> {
        self.rank(product, None, catalog)
    }

    pub fn recommend_request(
        &self,
        request: &RecommendationRequest,
        catalog: &[Material],
    ) -> Result<RecommendationOutcome, EngineError> {
        self.rank(&request.product, request.top_n, catalog)
    }

    fn rank(
        &self,
        product: &ProductSpec,
        top_n: Option<usize>,
        catalog: &[Material],
    ) -> Result<RecommendationOutcome, EngineError> {
        product.validate()?;
        let top_n = top_n.unwrap_or(self.config.top_n);
        if top_n == 0 {
            return Err(EngineError::validation("top_n must be >= 1"));
        }

        let weights =
            ResolvedWeights::resolve(product.weights.as_ref(), self.config.default_weights);

        if catalog.is_empty() {
            debug!("empty catalog; nothing to rank");
            return Ok(RecommendationOutcome::empty(weights, 0, None));
        }

        let records = features::derive_records(product, catalog);
        let predictions = prediction::predict_pairs(&self.predictor, &records)?;
        debug!(materials = records.len(), "predictions ready");

        let feasible =
            feasibility::filter(&predictions, product.max_budget, self.config.co2_threshold);
        let co2_threshold = feasible.co2_threshold();
        match feasible.feasibility() {
            Feasibility::Empty => {
                info!(
                    evaluated = catalog.len(),
                    max_budget = product.max_budget,
                    "no material fits the budget"
                );
                return Ok(RecommendationOutcome::empty(
                    weights,
                    catalog.len(),
                    co2_threshold,
                ));
            }
            Feasibility::Relaxed => warn!(
                policy = %self.config.co2_threshold,
                threshold = ?co2_threshold,
                "no material met both budget and CO₂ cutoff; relaxed to budget only"
            ),
            Feasibility::Strict => {}
        }

        let survivors = feasible.indices();
        let survivor_predictions: Vec<PredictionPair> =
            survivors.iter().map(|&i| predictions[i]).collect();
        let survivor_flags: Vec<ConstraintFlags> =
            survivors.iter().map(|&i| records[i].flags()).collect();
        let scores =
            scoring::score_candidates(&survivor_predictions, &survivor_flags, &weights);

        let mut candidates: Vec<ScoredCandidate> = survivors
            .iter()
            .zip(scores)
            .zip(&survivor_flags)
            .map(|((&i, s), &flags)| {
                ScoredCandidate::build(&records[i], &catalog[i], predictions[i], flags, &s)
            })
            .collect();

        // Stable: equal ranking scores keep catalog order.
        candidates.sort_by(|a, b| {
            b.ranking_score
                .partial_cmp(&a.ranking_score)
                .unwrap_or(Ordering::Equal)
        });
        let feasible_count = candidates.len();
        candidates.truncate(top_n);

        info!(
            evaluated = catalog.len(),
            feasible = feasible_count,
            returned = candidates.len(),
            best = candidates.first().map(|c| c.material_id.as_str()),
            "recommendation ranked"
        );

        Ok(RecommendationOutcome {
            candidates,
            feasibility: feasible.feasibility(),
            co2_threshold,
            weights,
            evaluated: catalog.len(),
            feasible: feasible_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThresholdPolicy;
    use crate::error::{ErrorKind, PredictorError};
    use crate::prediction::{RawPredictions, TablePredictor};
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    fn id(s: &str) -> MaterialId {
        MaterialId::new(s).unwrap()
    }

    fn sturdy(s: &str) -> Material {
        Material::new(id(s), format!("Material {s}"))
            .with_type("Paper")
            .with_barriers(9.0, 9.0, 9.0)
            .with_cost_per_kg(1.0)
    }

    fn budget_only() -> EngineConfig {
        EngineConfig {
            co2_threshold: ThresholdPolicy::Disabled,
            ..EngineConfig::default()
        }
    }

    /// Counts calls and fails every time.
    #[derive(Default)]
    struct OfflinePredictor {
        calls: AtomicUsize,
    }

    impl Predictor for OfflinePredictor {
        fn predict(&self, _: &[InferenceRecord]) -> Result<RawPredictions, PredictorError> {
            self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            Err(PredictorError::Unavailable("model store unreachable".into()))
        }
    }

    #[test]
    fn invalid_product_is_rejected_before_prediction() {
        let predictor = OfflinePredictor::default();
        let engine = RecommendationEngine::new(&predictor);

        let err = engine
            .recommend(&ProductSpec::new(-1.0, 10.0), &[sturdy("A")])
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(predictor.calls.load(AtomicOrdering::SeqCst), 0);
    }

    #[test]
    fn predictor_failure_is_fatal_not_empty() {
        let predictor = OfflinePredictor::default();
        let engine = RecommendationEngine::new(&predictor);

        let err = engine
            .recommend(&ProductSpec::new(1.0, 10.0), &[sturdy("A")])
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::PredictorUnavailable);
        assert_eq!(predictor.calls.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn empty_catalog_is_an_empty_outcome() {
        let engine = RecommendationEngine::new(OfflinePredictor::default());
        let outcome = engine.recommend(&ProductSpec::new(1.0, 10.0), &[]).unwrap();

        assert!(outcome.is_empty());
        assert!(outcome.best().is_none());
        assert_eq!(outcome.feasibility, Feasibility::Empty);
        assert_eq!(outcome.evaluated, 0);
    }

    #[test]
    fn truncates_to_requested_top_n() {
        let catalog: Vec<Material> = (0..8).map(|i| sturdy(&format!("M{i}"))).collect();
        let mut predictor = TablePredictor::new();
        for (i, m) in catalog.iter().enumerate() {
            predictor.insert(m.id.clone(), 1.0 + i as f64, 1.0 + i as f64);
        }
        let engine = RecommendationEngine::with_config(predictor, budget_only());
        let product = ProductSpec::new(1.0, 100.0);

        let default_n = engine.recommend(&product, &catalog).unwrap();
        assert_eq!(default_n.candidates.len(), 5);
        assert_eq!(default_n.feasible, 8);

        let request = RecommendationRequest {
            product: product.clone(),
            top_n: Some(2),
        };
        let two = engine.recommend_request(&request, &catalog).unwrap();
        assert_eq!(two.candidates.len(), 2);
        assert_eq!(two.best().unwrap().material_id, id("M0"));

        let zero = RecommendationRequest {
            product,
            top_n: Some(0),
        };
        let err = engine.recommend_request(&zero, &catalog).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn ties_keep_catalog_order() {
        let catalog = vec![sturdy("C"), sturdy("A"), sturdy("B")];
        let predictor = TablePredictor::new()
            .with(id("A"), 2.0, 2.0)
            .with(id("B"), 2.0, 2.0)
            .with(id("C"), 2.0, 2.0);
        let engine = RecommendationEngine::with_config(predictor, budget_only());

        let outcome = engine.recommend(&ProductSpec::new(1.0, 10.0), &catalog).unwrap();
        let order: Vec<&str> = outcome
            .candidates
            .iter()
            .map(|c| c.material_id.as_str())
            .collect();

        assert_eq!(order, vec!["C", "A", "B"]);
        for c in &outcome.candidates {
            assert_eq!(c.cost_efficiency_index, 50.0);
            assert_eq!(c.co2_impact_index, 50.0);
        }
    }

    #[test]
    fn relaxed_outcome_is_reported() {
        let catalog = vec![sturdy("A"), sturdy("B"), sturdy("C")];
        let predictor = TablePredictor::new()
            .with(id("A"), 50.0, 1.0)
            .with(id("B"), 60.0, 1.5)
            .with(id("C"), 5.0, 9.0);
        let engine = RecommendationEngine::new(predictor);

        let outcome = engine.recommend(&ProductSpec::new(1.0, 10.0), &catalog).unwrap();

        assert_eq!(outcome.feasibility, Feasibility::Relaxed);
        assert_eq!(outcome.co2_threshold, Some(1.5));
        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.best().unwrap().material_id, id("C"));
    }

    #[test]
    fn catalog_flags_flow_into_penalty_and_reason() {
        let weak = Material::new(id("W"), "Tissue")
            .with_barriers(1.0, 9.0, 9.0)
            .with_cost_per_kg(1.0);
        let catalog = vec![sturdy("S"), weak];
        let predictor = TablePredictor::new()
            .with(id("S"), 2.0, 2.0)
            .with(id("W"), 2.0, 2.0);
        let engine = RecommendationEngine::with_config(predictor, budget_only());

        let outcome = engine.recommend(&ProductSpec::new(1.0, 10.0), &catalog).unwrap();
        let weak = outcome
            .candidates
            .iter()
            .find(|c| c.material_id == id("W"))
            .unwrap();

        assert!(weak.flags.strength_insufficient);
        // base = 0.5*50 + 0.35*50 + 0.15*75 = 53.75, minus 25.
        assert!((weak.suitability_score - 28.75).abs() < 1e-9);
        assert_eq!(weak.confidence, weak.suitability_score);
        assert_eq!(weak.reason, "Strength may be insufficient");
        assert_eq!(outcome.best().unwrap().material_id, id("S"));
    }

    #[test]
    fn one_engine_serves_concurrent_requests() {
        let catalog: Vec<Material> = (0..20).map(|i| sturdy(&format!("M{i}"))).collect();
        let mut predictor = TablePredictor::new();
        for (i, m) in catalog.iter().enumerate() {
            let f = i as f64;
            predictor.insert(m.id.clone(), 1.0 + (f * 7.0) % 9.0, 0.5 + (f * 3.0) % 4.0);
        }
        let engine = RecommendationEngine::new(predictor);
        let product = ProductSpec::new(1.0, 8.0).with_category("Food");
        let expected = engine.recommend(&product, &catalog).unwrap();

        let outcomes: Vec<RecommendationOutcome> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| engine.recommend(&product, &catalog).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(!expected.is_empty());
        assert_eq!(outcomes.len(), 8);
        for outcome in outcomes {
            assert_eq!(outcome, expected);
        }
    }
}
