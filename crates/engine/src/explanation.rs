//! Explanation builder. Presentation only: reads scores, never changes them.

use serde::{Deserialize, Serialize};

use crate::features::{ConstraintFlags, InferenceRecord};
use crate::prediction::PredictionPair;
use crate::scoring::CandidateScores;

/// Index at or above which a dimension counts as a strength.
pub const STRONG_INDEX: f64 = 70.0;
/// CO₂ index at or below which emissions are called out as high.
pub const WEAK_CO2_INDEX: f64 = 40.0;

pub const DEFAULT_REASON: &str = "Optimised for sustainability and cost.";

/// One plain-language sentence per dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub cost: String,
    pub co2: String,
    pub strength: String,
    pub moisture: String,
    pub oxygen: String,
    pub sustainability: String,
}

/// Short comma-separated tag list.
pub fn build_reason(scores: &CandidateScores, flags: &ConstraintFlags) -> String {
    let mut tags: Vec<&str> = Vec::new();
    if scores.co2_impact_index >= STRONG_INDEX {
        tags.push("Low CO₂ footprint");
    }
    if scores.cost_efficiency_index >= STRONG_INDEX {
        tags.push("Cost efficient");
    }
    if flags.over_budget {
        tags.push("Over budget");
    }
    if flags.strength_insufficient {
        tags.push("Strength may be insufficient");
    }

    if tags.is_empty() {
        DEFAULT_REASON.to_string()
    } else {
        tags.join(", ")
    }
}

pub fn build_explanation(
    record: &InferenceRecord,
    prediction: &PredictionPair,
    scores: &CandidateScores,
) -> Explanation {
    let cost = if record.budget_gap >= 0.0 {
        format!(
            "Estimated cost ({:.2} USD/unit) is within the budget, leaving {:.2} USD headroom.",
            prediction.cost, record.budget_gap
        )
    } else {
        format!(
            "Estimated cost ({:.2} USD/unit) exceeds the budget by {:.2} USD.",
            prediction.cost,
            record.budget_gap.abs()
        )
    };

    let co2 = if scores.co2_impact_index >= STRONG_INDEX {
        format!(
            "CO₂ emissions are low compared to alternatives ({:.2} kg/unit).",
            prediction.co2
        )
    } else if scores.co2_impact_index <= WEAK_CO2_INDEX {
        format!("CO₂ emissions are relatively high ({:.2} kg/unit).", prediction.co2)
    } else {
        format!("CO₂ emissions are moderate ({:.2} kg/unit).", prediction.co2)
    };

    let strength = if record.strength_gap >= 0.0 {
        "Strength rating meets or exceeds the product's requirement."
    } else {
        "Strength rating is below the product's requirement."
    };
    let moisture = if record.moisture_gap >= 0.0 {
        "Moisture barrier meets or exceeds the product's moisture requirement."
    } else {
        "Moisture barrier is below the product's moisture requirement."
    };
    let oxygen = if record.oxygen_gap >= 0.0 {
        "Oxygen barrier meets or exceeds the product's oxygen sensitivity."
    } else {
        "Oxygen barrier is below the product's oxygen sensitivity."
    };

    let mut traits: Vec<&str> = Vec::new();
    if record.is_biodegradable() {
        traits.push("biodegradable");
    }
    if record.is_recyclable() {
        traits.push("recyclable");
    }
    let sustainability = if !traits.is_empty() {
        format!("Material is {}.", traits.join(" and "))
    } else if scores.co2_impact_index >= STRONG_INDEX {
        "Overall sustainability is strong due to low emissions.".to_string()
    } else {
        "No explicit sustainability certifications available.".to_string()
    };

    Explanation {
        cost,
        co2,
        strength: strength.to_string(),
        moisture: moisture.to_string(),
        oxygen: oxygen.to_string(),
        sustainability,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::derive_records;
    use ecopack_catalog::Material;
    use ecopack_core::MaterialId;
    use ecopack_products::ProductSpec;

    fn scores(cost_index: f64, co2_index: f64) -> CandidateScores {
        CandidateScores {
            cost_efficiency_index: cost_index,
            co2_impact_index: co2_index,
            suitability_score: 0.0,
            ranking_score: 0.0,
        }
    }

    fn record(material: Material, product: &ProductSpec) -> InferenceRecord {
        derive_records(product, &[material]).remove(0)
    }

    #[test]
    fn reason_collects_tags_in_fixed_order() {
        let flags = ConstraintFlags {
            strength_insufficient: true,
            over_budget: true,
            ..ConstraintFlags::default()
        };
        assert_eq!(
            build_reason(&scores(80.0, 90.0), &flags),
            "Low CO₂ footprint, Cost efficient, Over budget, Strength may be insufficient"
        );
    }

    #[test]
    fn reason_falls_back_to_neutral_phrase() {
        assert_eq!(
            build_reason(&scores(50.0, 69.9), &ConstraintFlags::default()),
            DEFAULT_REASON
        );
    }

    #[test]
    fn explanation_reflects_gaps_and_indices() {
        let product = ProductSpec::new(2.0, 5.0)
            .with_required_strength(6.0)
            .with_barrier_needs(4.0, 8.0);
        let material = Material::new(MaterialId::new("M").unwrap(), "Foil")
            .with_barriers(5.0, 6.0, 9.0)
            .with_cost_per_kg(3.0)
            .with_end_of_life(false, true);
        let r = record(material, &product);
        let prediction = PredictionPair { cost: 6.0, co2: 1.25 };

        let e = build_explanation(&r, &prediction, &scores(10.0, 30.0));

        assert_eq!(
            e.cost,
            "Estimated cost (6.00 USD/unit) exceeds the budget by 1.00 USD."
        );
        assert_eq!(e.co2, "CO₂ emissions are relatively high (1.25 kg/unit).");
        assert!(e.strength.contains("below"));
        assert!(e.moisture.contains("meets or exceeds"));
        assert!(e.oxygen.contains("meets or exceeds"));
        assert_eq!(e.sustainability, "Material is recyclable.");
    }

    #[test]
    fn sustainability_falls_back_to_emissions() {
        let product = ProductSpec::new(1.0, 10.0);
        let bare = Material::new(MaterialId::new("M").unwrap(), "Bare").with_cost_per_kg(1.0);
        let r = record(bare, &product);
        let prediction = PredictionPair { cost: 1.0, co2: 0.2 };

        let strong = build_explanation(&r, &prediction, &scores(50.0, 75.0));
        assert_eq!(
            strong.sustainability,
            "Overall sustainability is strong due to low emissions."
        );
        assert!(strong.co2.starts_with("CO₂ emissions are low"));
        assert!(strong.cost.contains("leaving 9.00 USD headroom"));

        let moderate = build_explanation(&r, &prediction, &scores(50.0, 55.0));
        assert!(moderate.co2.starts_with("CO₂ emissions are moderate"));
        assert!(moderate.sustainability.starts_with("No explicit"));
    }
}
