use serde::{Deserialize, Serialize};

use ecopack_core::{Entity, MaterialId};

/// A packaging material as supplied by the catalog.
///
/// Catalog rows are frequently sparse, so every attribute is optional here.
/// Missing values are resolved once, by the feature deriver in the engine, and
/// never inside the scoring logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,

    /// Category tag (e.g. "Paper", "Bioplastic").
    #[serde(default)]
    pub material_type: Option<String>,

    /// 0–10 scale.
    #[serde(default)]
    pub strength_rating: Option<f64>,
    /// 0–10 scale.
    #[serde(default)]
    pub moisture_barrier: Option<f64>,
    /// 0–10 scale.
    #[serde(default)]
    pub oxygen_barrier: Option<f64>,

    /// USD per kg of packaged product.
    #[serde(default)]
    pub cost_per_kg: Option<f64>,
    /// kg CO₂ per kg of packaged product.
    #[serde(default)]
    pub co2_per_kg: Option<f64>,

    #[serde(default)]
    pub biodegradable: Option<bool>,
    #[serde(default)]
    pub recyclable: Option<bool>,
}

impl Material {
    /// A material with identity only; every attribute unknown.
    pub fn new(id: MaterialId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            material_type: None,
            strength_rating: None,
            moisture_barrier: None,
            oxygen_barrier: None,
            cost_per_kg: None,
            co2_per_kg: None,
            biodegradable: None,
            recyclable: None,
        }
    }

    pub fn with_type(mut self, material_type: impl Into<String>) -> Self {
        self.material_type = Some(material_type.into());
        self
    }

    /// Set strength, moisture barrier and oxygen barrier ratings.
    pub fn with_barriers(mut self, strength: f64, moisture: f64, oxygen: f64) -> Self {
        self.strength_rating = Some(strength);
        self.moisture_barrier = Some(moisture);
        self.oxygen_barrier = Some(oxygen);
        self
    }

    pub fn with_cost_per_kg(mut self, cost: f64) -> Self {
        self.cost_per_kg = Some(cost);
        self
    }

    pub fn with_co2_per_kg(mut self, co2: f64) -> Self {
        self.co2_per_kg = Some(co2);
        self
    }

    pub fn with_end_of_life(mut self, biodegradable: bool, recyclable: bool) -> Self {
        self.biodegradable = Some(biodegradable);
        self.recyclable = Some(recyclable);
        self
    }

    pub fn is_biodegradable(&self) -> bool {
        self.biodegradable.unwrap_or(false)
    }

    pub fn is_recyclable(&self) -> bool {
        self.recyclable.unwrap_or(false)
    }
}

impl Entity for Material {
    type Id = MaterialId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
