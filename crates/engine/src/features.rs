//! Feature deriver: one inference record per (product, material).

use serde::{Deserialize, Serialize};

use ecopack_catalog::Material;
use ecopack_core::MaterialId;
use ecopack_products::ProductSpec;

/// Sentinel for categorical fields the catalog or caller left blank.
pub const MISSING_CATEGORY: &str = "missing";

/// Hard-constraint violations, derived from the sign of the gaps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintFlags {
    pub strength_insufficient: bool,
    pub moisture_insufficient: bool,
    pub oxygen_insufficient: bool,
    pub over_budget: bool,
}

impl ConstraintFlags {
    pub fn any(&self) -> bool {
        self.strength_insufficient
            || self.moisture_insufficient
            || self.oxygen_insufficient
            || self.over_budget
    }
}

/// Complete, defaulted feature row handed to the regressors.
///
/// Transient: built fresh on every call and dropped afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceRecord {
    pub material_id: MaterialId,
    pub material_type: String,
    pub product_category: String,

    pub strength_rating: f64,
    pub moisture_barrier: f64,
    pub oxygen_barrier: f64,
    pub cost_per_kg: f64,
    pub co2_per_kg: f64,
    pub biodegradable: f64,
    pub recyclable: f64,

    pub weight_kg: f64,
    pub fragility: f64,
    pub required_strength: f64,
    pub moisture_required: f64,
    pub oxygen_sensitivity: f64,
    pub max_budget: f64,
    pub shipping_distance_km: f64,
    pub preferred_biodegradable: f64,
    pub preferred_recyclable: f64,

    pub strength_gap: f64,
    pub moisture_gap: f64,
    pub oxygen_gap: f64,
    pub budget_gap: f64,
    pub logistics_risk: f64,
    pub sustainability_pref_score: f64,
}

impl InferenceRecord {
    /// Names accepted by [`InferenceRecord::numeric_feature`].
    pub const NUMERIC_FEATURES: &'static [&'static str] = &[
        "strength_rating",
        "moisture_barrier",
        "oxygen_barrier",
        "cost_per_kg",
        "co2_per_kg",
        "biodegradable",
        "recyclable",
        "weight_kg",
        "fragility",
        "required_strength",
        "moisture_required",
        "oxygen_sensitivity",
        "max_budget",
        "shipping_distance_km",
        "preferred_biodegradable",
        "preferred_recyclable",
        "strength_gap",
        "moisture_gap",
        "oxygen_gap",
        "budget_gap",
        "logistics_risk",
        "sustainability_pref_score",
    ];

    /// Names accepted by [`InferenceRecord::categorical_feature`].
    pub const CATEGORICAL_FEATURES: &'static [&'static str] =
        &["material_type", "product_category"];

    pub fn numeric_feature(&self, name: &str) -> Option<f64> {
        let v = match name {
            "strength_rating" => self.strength_rating,
            "moisture_barrier" => self.moisture_barrier,
            "oxygen_barrier" => self.oxygen_barrier,
            "cost_per_kg" => self.cost_per_kg,
            "co2_per_kg" => self.co2_per_kg,
            "biodegradable" => self.biodegradable,
            "recyclable" => self.recyclable,
            "weight_kg" => self.weight_kg,
            "fragility" => self.fragility,
            "required_strength" => self.required_strength,
            "moisture_required" => self.moisture_required,
            "oxygen_sensitivity" => self.oxygen_sensitivity,
            "max_budget" => self.max_budget,
            "shipping_distance_km" => self.shipping_distance_km,
            "preferred_biodegradable" => self.preferred_biodegradable,
            "preferred_recyclable" => self.preferred_recyclable,
            "strength_gap" => self.strength_gap,
            "moisture_gap" => self.moisture_gap,
            "oxygen_gap" => self.oxygen_gap,
            "budget_gap" => self.budget_gap,
            "logistics_risk" => self.logistics_risk,
            "sustainability_pref_score" => self.sustainability_pref_score,
            _ => return None,
        };
        Some(v)
    }

    pub fn categorical_feature(&self, name: &str) -> Option<&str> {
        match name {
            "material_type" => Some(&self.material_type),
            "product_category" => Some(&self.product_category),
            _ => None,
        }
    }

    pub fn flags(&self) -> ConstraintFlags {
        ConstraintFlags {
            strength_insufficient: self.strength_gap < 0.0,
            moisture_insufficient: self.moisture_gap < 0.0,
            oxygen_insufficient: self.oxygen_gap < 0.0,
            over_budget: self.budget_gap < 0.0,
        }
    }

    pub fn is_biodegradable(&self) -> bool {
        self.biodegradable >= 1.0
    }

    pub fn is_recyclable(&self) -> bool {
        self.recyclable >= 1.0
    }
}

/// Build one record per catalog row, in catalog order.
///
/// Never fails: unknown numeric attributes become 0, blank categories become
/// [`MISSING_CATEGORY`].
pub fn derive_records(product: &ProductSpec, catalog: &[Material]) -> Vec<InferenceRecord> {
    let product_category = category_or_missing(Some(product.category.as_str()));
    let required_strength = product.effective_required_strength();
    let preferred_biodegradable = indicator(product.preferred_biodegradable);
    let preferred_recyclable = indicator(product.preferred_recyclable);

    let logistics_risk = product.fragility * product.shipping_distance_km;
    let sustainability_pref_score = 0.5 * preferred_biodegradable + 0.5 * preferred_recyclable;

    catalog
        .iter()
        .map(|m| {
            let strength_rating = known(m.strength_rating);
            let moisture_barrier = known(m.moisture_barrier);
            let oxygen_barrier = known(m.oxygen_barrier);
            let cost_per_kg = known(m.cost_per_kg);

            InferenceRecord {
                material_id: m.id.clone(),
                material_type: category_or_missing(m.material_type.as_deref()),
                product_category: product_category.clone(),

                strength_rating,
                moisture_barrier,
                oxygen_barrier,
                cost_per_kg,
                co2_per_kg: known(m.co2_per_kg),
                biodegradable: indicator(m.is_biodegradable()),
                recyclable: indicator(m.is_recyclable()),

                weight_kg: product.weight_kg,
                fragility: product.fragility,
                required_strength,
                moisture_required: product.moisture_required,
                oxygen_sensitivity: product.oxygen_sensitivity,
                max_budget: product.max_budget,
                shipping_distance_km: product.shipping_distance_km,
                preferred_biodegradable,
                preferred_recyclable,

                strength_gap: strength_rating - required_strength,
                moisture_gap: moisture_barrier - product.moisture_required,
                oxygen_gap: oxygen_barrier - product.oxygen_sensitivity,
                budget_gap: product.max_budget - cost_per_kg * product.weight_kg,
                logistics_risk,
                sustainability_pref_score,
            }
        })
        .collect()
}

fn known(v: Option<f64>) -> f64 {
    v.filter(|x| x.is_finite()).unwrap_or(0.0)
}

fn indicator(flag: bool) -> f64 {
    if flag { 1.0 } else { 0.0 }
}

fn category_or_missing(v: Option<&str>) -> String {
    match v.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => MISSING_CATEGORY.to_string(),
    }
}
