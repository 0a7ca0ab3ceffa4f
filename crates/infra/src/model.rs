//! Linear cost/CO₂ regressors described by a JSON model manifest.
//!
//! Manifest shape:
//!
//! ```json
//! {
//!   "name": "ecopack-linear-2024-06",
//!   "cost": {
//!     "intercept": 0.4,
//!     "coefficients": { "cost_per_kg": 1.0, "weight_kg": 0.2 },
//!     "categorical": { "material_type": { "Glass": 0.8 } }
//!   },
//!   "co2": { "intercept": 0.1, "coefficients": { "co2_per_kg": 1.0 } }
//! }
//! ```
//!
//! Feature names are those of `InferenceRecord`. Unknown categorical levels contribute 0.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use ecopack_engine::{InferenceRecord, PredictorError, Regressor, RegressorPair};

pub type LinearPredictor = RegressorPair<LinearModel, LinearModel>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    #[serde(default)]
    pub intercept: f64,
    #[serde(default)]
    pub coefficients: BTreeMap<String, f64>,
    /// feature name -> level -> coefficient (one-hot encoding).
    #[serde(default)]
    pub categorical: BTreeMap<String, BTreeMap<String, f64>>,
}

impl LinearModel {
    /// Reject coefficients for features the inference record does not carry.
    pub fn validate(&self) -> Result<(), PredictorError> {
        if !self.intercept.is_finite() {
            return Err(PredictorError::Unavailable("intercept is not finite".into()));
        }
        for (name, coef) in &self.coefficients {
            if !InferenceRecord::NUMERIC_FEATURES.contains(&name.as_str()) {
                return Err(PredictorError::Unavailable(format!(
                    "unknown numeric feature '{name}'"
                )));
            }
            if !coef.is_finite() {
                return Err(PredictorError::Unavailable(format!(
                    "coefficient for '{name}' is not finite"
                )));
            }
        }
        for name in self.categorical.keys() {
            if !InferenceRecord::CATEGORICAL_FEATURES.contains(&name.as_str()) {
                return Err(PredictorError::Unavailable(format!(
                    "unknown categorical feature '{name}'"
                )));
            }
        }
        Ok(())
    }

    pub fn predict_one(&self, record: &InferenceRecord) -> f64 {
        let numeric: f64 = self
            .coefficients
            .iter()
            .map(|(name, coef)| coef * record.numeric_feature(name).unwrap_or(0.0))
            .sum();
        let categorical: f64 = self
            .categorical
            .iter()
            .filter_map(|(name, levels)| {
                let level = record.categorical_feature(name)?;
                levels.get(level).copied()
            })
            .sum();
        self.intercept + numeric + categorical
    }
}

impl Regressor for LinearModel {
    fn predict(&self, records: &[InferenceRecord]) -> Result<Vec<f64>, PredictorError> {
        Ok(records.iter().map(|r| self.predict_one(r)).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelManifest {
    #[serde(default)]
    pub name: Option<String>,
    pub cost: LinearModel,
    pub co2: LinearModel,
}

impl ModelManifest {
    pub fn from_json(json: &str) -> Result<Self, PredictorError> {
        let manifest: Self = serde_json::from_str(json)
            .map_err(|e| PredictorError::Unavailable(format!("malformed model manifest: {e}")))?;
        manifest.cost.validate().map_err(|e| e.context("cost model"))?;
        manifest.co2.validate().map_err(|e| e.context("co2 model"))?;
        Ok(manifest)
    }

    pub fn load(path: &Path) -> Result<Self, PredictorError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            PredictorError::Unavailable(format!(
                "cannot read model manifest {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&raw)
    }

    pub fn into_predictor(self) -> LinearPredictor {
        RegressorPair::new(self.cost, self.co2)
    }
}
