//! End-to-end scenarios for the recommendation engine.

use ecopack_catalog::Material;
use ecopack_core::MaterialId;
use ecopack_engine::{
    EngineConfig, ErrorKind, Feasibility, RecommendationEngine, ResolvedWeights, TablePredictor,
    ThresholdPolicy,
};
use ecopack_products::{ProductSpec, WeightOverride};

const EPS: f64 = 1e-6;

fn id(s: &str) -> MaterialId {
    MaterialId::new(s).unwrap()
}

/// Meets the default product requirements (strength/moisture/oxygen 5) at 1 USD/kg.
fn sturdy(s: &str, name: &str) -> Material {
    Material::new(id(s), name)
        .with_type("Paper")
        .with_barriers(8.0, 8.0, 8.0)
        .with_cost_per_kg(1.0)
}

fn product() -> ProductSpec {
    ProductSpec::new(1.0, 10.0).with_category("Electronics")
}

#[test]
fn scenario_a_two_feasible_materials_ranked_by_blend() {
    // C is over budget; including it puts the CO₂ median at 2.0 so that both
    // A and B clear the strict filter.
    let catalog = vec![
        sturdy("A", "Molded pulp"),
        sturdy("B", "Recycled PET"),
        sturdy("C", "Aluminium"),
    ];
    let predictor = TablePredictor::new()
        .with(id("A"), 5.0, 2.0)
        .with(id("B"), 8.0, 1.0)
        .with(id("C"), 20.0, 3.0);
    let engine = RecommendationEngine::new(predictor);

    let outcome = engine.recommend(&product(), &catalog).unwrap();
    assert_eq!(outcome.feasibility, Feasibility::Strict);
    assert_eq!(outcome.co2_threshold, Some(2.0));
    assert_eq!(outcome.feasible, 2);

    let b = &outcome.candidates[0];
    let a = &outcome.candidates[1];
    assert_eq!(b.material_id, id("B"));
    assert_eq!(a.material_id, id("A"));

    assert!(b.co2_impact_index > a.co2_impact_index);
    assert!(a.cost_efficiency_index > b.cost_efficiency_index);

    // A: suitability = 0.35*100 + 0.15*100 = 50; ranking = 0.6*50 + 0.2*100 = 50
    // B: suitability = 0.50*100 + 0.15*100 = 65; ranking = 0.6*65 + 0.2*100 = 59
    assert!((a.suitability_score - 50.0).abs() < EPS);
    assert!((a.ranking_score - 50.0).abs() < EPS);
    assert!((b.suitability_score - 65.0).abs() < EPS);
    assert!((b.ranking_score - 59.0).abs() < EPS);

    assert_eq!(a.reason, "Cost efficient");
    assert_eq!(b.reason, "Low CO₂ footprint");
    assert_eq!(outcome.best().unwrap().material_name, "Recycled PET");
}

#[test]
fn scenario_a_with_median_prunes_the_higher_emitter_of_two() {
    let catalog = vec![sturdy("A", "Molded pulp"), sturdy("B", "Recycled PET")];
    let predictor = TablePredictor::new()
        .with(id("A"), 5.0, 2.0)
        .with(id("B"), 8.0, 1.0);

    let median = RecommendationEngine::new(predictor.clone())
        .recommend(&product(), &catalog)
        .unwrap();
    assert_eq!(median.candidates.len(), 1);
    assert_eq!(median.best().unwrap().material_id, id("B"));

    let budget_only = RecommendationEngine::with_config(
        predictor,
        EngineConfig {
            co2_threshold: ThresholdPolicy::Disabled,
            ..EngineConfig::default()
        },
    )
    .recommend(&product(), &catalog)
    .unwrap();
    assert_eq!(budget_only.candidates.len(), 2);
    assert!((budget_only.candidates[0].ranking_score - 59.0).abs() < EPS);
    assert!((budget_only.candidates[1].ranking_score - 50.0).abs() < EPS);
}

#[test]
fn scenario_b_nothing_affordable_is_empty_not_error() {
    let catalog = vec![sturdy("A", "Glass"), sturdy("B", "Steel")];
    let predictor = TablePredictor::new()
        .with(id("A"), 1.5, 2.0)
        .with(id("B"), 3.0, 1.0);
    let engine = RecommendationEngine::new(predictor);

    let outcome = engine
        .recommend(&ProductSpec::new(1.0, 1.0), &catalog)
        .unwrap();

    assert!(outcome.is_empty());
    assert!(outcome.best().is_none());
    assert_eq!(outcome.feasibility, Feasibility::Empty);
    assert_eq!(outcome.evaluated, 2);
}

#[test]
fn scenario_c_oversized_weights_rescale() {
    let spec = product().with_weights(WeightOverride::new(0.9, 0.9));
    let catalog = vec![sturdy("A", "Molded pulp"), sturdy("B", "Recycled PET")];
    let predictor = TablePredictor::new()
        .with(id("A"), 5.0, 2.0)
        .with(id("B"), 8.0, 1.0);
    let engine = RecommendationEngine::with_config(
        predictor,
        EngineConfig {
            co2_threshold: ThresholdPolicy::Disabled,
            ..EngineConfig::default()
        },
    );

    let outcome = engine.recommend(&spec, &catalog).unwrap();
    let ResolvedWeights { co2, cost, risk } = outcome.weights;
    assert!((co2 - 0.5).abs() < EPS);
    assert!((cost - 0.5).abs() < EPS);
    assert!(risk.abs() < EPS);

    // With equal co2/cost weights and no risk share, both materials score 50.
    for c in &outcome.candidates {
        assert!((c.suitability_score - 50.0).abs() < EPS);
        assert!((c.ranking_score - 50.0).abs() < EPS);
    }
    // Equal ranking: catalog order is kept.
    assert_eq!(outcome.candidates[0].material_id, id("A"));
}

#[test]
fn scenario_d_identical_costs_get_neutral_cost_index() {
    let catalog = vec![
        sturdy("A", "Kraft"),
        sturdy("B", "Bagasse"),
        sturdy("C", "Corrugated"),
    ];
    let predictor = TablePredictor::new()
        .with(id("A"), 4.0, 1.0)
        .with(id("B"), 4.0, 2.0)
        .with(id("C"), 4.0, 3.0);
    let engine = RecommendationEngine::with_config(
        predictor,
        EngineConfig {
            co2_threshold: ThresholdPolicy::Disabled,
            ..EngineConfig::default()
        },
    );

    let outcome = engine.recommend(&product(), &catalog).unwrap();
    assert_eq!(outcome.candidates.len(), 3);
    for c in &outcome.candidates {
        assert_eq!(c.cost_efficiency_index, 50.0);
    }
}

#[test]
fn validation_error_carries_machine_readable_kind() {
    let engine = RecommendationEngine::new(TablePredictor::new());
    let err = engine
        .recommend(&product().with_fragility(42.0), &[sturdy("A", "Kraft")])
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("fragility"));
}

#[test]
fn outcome_serializes_with_structured_explanation() {
    let catalog = vec![sturdy("A", "Kraft").with_end_of_life(true, true)];
    let predictor = TablePredictor::new().with(id("A"), 2.0, 0.5);
    let outcome = RecommendationEngine::new(predictor)
        .recommend(&product(), &catalog)
        .unwrap();

    let json = serde_json::to_value(&outcome).unwrap();
    let best = &json["candidates"][0];
    assert_eq!(best["material_id"], "A");
    assert_eq!(best["explanation"]["sustainability"], "Material is biodegradable and recyclable.");
    assert_eq!(json["feasibility"], "strict");
    assert!(best["confidence"].is_number());
}
