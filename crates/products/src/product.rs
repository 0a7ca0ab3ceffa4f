use serde::{Deserialize, Deserializer, Serialize};

use ecopack_core::{DomainError, DomainResult, ValueObject};

/// Caller-supplied objective weights.
///
/// Either key may be omitted; the engine fills it from its configured default.
/// Out-of-range values are not rejected here: negatives are clamped and
/// oversized sums rescaled during weight resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightOverride {
    #[serde(default)]
    pub co2: Option<f64>,
    #[serde(default)]
    pub cost: Option<f64>,
}

impl WeightOverride {
    pub fn new(co2: f64, cost: f64) -> Self {
        Self {
            co2: Some(co2),
            cost: Some(cost),
        }
    }
}

impl ValueObject for WeightOverride {}

/// Physical/environmental requirements of the product being packaged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSpec {
    /// Must be > 0.
    pub weight_kg: f64,
    /// 1–10.
    pub fragility: f64,
    /// 0–10. Defaults to `fragility` when absent.
    #[serde(default)]
    pub required_strength: Option<f64>,
    /// 0–10.
    pub moisture_required: f64,
    /// 0–10.
    pub oxygen_sensitivity: f64,
    /// Maximum budget per unit (USD). Must be > 0.
    pub max_budget: f64,
    /// Must be >= 0.
    pub shipping_distance_km: f64,
    /// `true`/`false` or `1`/`0` on the wire.
    #[serde(default, deserialize_with = "flag")]
    pub preferred_biodegradable: bool,
    #[serde(default, deserialize_with = "flag")]
    pub preferred_recyclable: bool,
    /// Free-text product category label.
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub weights: Option<WeightOverride>,
}

impl ProductSpec {
    /// A spec with mid-range requirements; adjust with the `with_*` methods.
    pub fn new(weight_kg: f64, max_budget: f64) -> Self {
        Self {
            weight_kg,
            fragility: 5.0,
            required_strength: None,
            moisture_required: 5.0,
            oxygen_sensitivity: 5.0,
            max_budget,
            shipping_distance_km: 500.0,
            preferred_biodegradable: false,
            preferred_recyclable: false,
            category: String::new(),
            weights: None,
        }
    }

    pub fn with_fragility(mut self, fragility: f64) -> Self {
        self.fragility = fragility;
        self
    }

    pub fn with_required_strength(mut self, strength: f64) -> Self {
        self.required_strength = Some(strength);
        self
    }

    /// Set moisture requirement and oxygen sensitivity.
    pub fn with_barrier_needs(mut self, moisture: f64, oxygen: f64) -> Self {
        self.moisture_required = moisture;
        self.oxygen_sensitivity = oxygen;
        self
    }

    pub fn with_shipping_distance(mut self, km: f64) -> Self {
        self.shipping_distance_km = km;
        self
    }

    pub fn with_preferences(mut self, biodegradable: bool, recyclable: bool) -> Self {
        self.preferred_biodegradable = biodegradable;
        self.preferred_recyclable = recyclable;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_weights(mut self, weights: WeightOverride) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn effective_required_strength(&self) -> f64 {
        self.required_strength.unwrap_or(self.fragility)
    }

    /// Reject malformed requirement sets before any computation happens.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_finite("weight_kg", self.weight_kg)?;
        if self.weight_kg <= 0.0 {
            return Err(DomainError::validation("weight_kg must be > 0"));
        }

        ensure_range("fragility", self.fragility, 1.0, 10.0)?;
        if let Some(strength) = self.required_strength {
            ensure_range("required_strength", strength, 0.0, 10.0)?;
        }
        ensure_range("moisture_required", self.moisture_required, 0.0, 10.0)?;
        ensure_range("oxygen_sensitivity", self.oxygen_sensitivity, 0.0, 10.0)?;

        ensure_finite("max_budget", self.max_budget)?;
        if self.max_budget <= 0.0 {
            return Err(DomainError::validation("max_budget must be > 0"));
        }

        ensure_finite("shipping_distance_km", self.shipping_distance_km)?;
        if self.shipping_distance_km < 0.0 {
            return Err(DomainError::validation("shipping_distance_km must be >= 0"));
        }

        if let Some(w) = &self.weights {
            if let Some(co2) = w.co2 {
                ensure_finite("weights.co2", co2)?;
            }
            if let Some(cost) = w.cost {
                ensure_finite("weights.cost", cost)?;
            }
        }

        Ok(())
    }
}

impl ValueObject for ProductSpec {}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(u8),
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(n) => Err(serde::de::Error::custom(format!(
            "expected a boolean or 0/1, got {n}"
        ))),
    }
}

fn ensure_finite(field: &str, value: f64) -> DomainResult<()> {
    if !value.is_finite() {
        return Err(DomainError::validation(format!(
            "{field} must be a finite number"
        )));
    }
    Ok(())
}

fn ensure_range(field: &str, value: f64, lo: f64, hi: f64) -> DomainResult<()> {
    ensure_finite(field, value)?;
    if value < lo || value > hi {
        return Err(DomainError::validation(format!(
            "{field} must be within [{lo}, {hi}], got {value}"
        )));
    }
    Ok(())
}
