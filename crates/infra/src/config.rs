//! Environment-driven configuration.
//!
//! Invalid values are logged and replaced by defaults rather than aborting startup.

use std::path::PathBuf;

use tracing::warn;

use ecopack_engine::{DefaultWeights, EngineConfig, ThresholdPolicy};

use crate::error::ServiceError;

pub const ENV_TOP_N: &str = "ECOPACK_TOP_N";
pub const ENV_CO2_THRESHOLD: &str = "ECOPACK_CO2_THRESHOLD";
pub const ENV_DEFAULT_CO2_WEIGHT: &str = "ECOPACK_DEFAULT_CO2_WEIGHT";
pub const ENV_DEFAULT_COST_WEIGHT: &str = "ECOPACK_DEFAULT_COST_WEIGHT";
pub const ENV_MODEL_MANIFEST: &str = "ECOPACK_MODEL_MANIFEST";
pub const ENV_CATALOG_PATH: &str = "ECOPACK_CATALOG_PATH";

const DEFAULT_MODEL_MANIFEST: &str = "models/model_manifest.json";
const DEFAULT_CATALOG_PATH: &str = "data/materials.json";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub model_manifest: PathBuf,
    pub catalog_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            model_manifest: PathBuf::from(DEFAULT_MODEL_MANIFEST),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map instead of the
    /// process environment).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let top_n = match get(ENV_TOP_N) {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    warn!(key = ENV_TOP_N, value = %raw, "invalid top-N; using default");
                    defaults.engine.top_n
                }
            },
            None => defaults.engine.top_n,
        };

        let co2_threshold = match get(ENV_CO2_THRESHOLD) {
            Some(raw) => raw.parse::<ThresholdPolicy>().unwrap_or_else(|e| {
                warn!(
                    key = ENV_CO2_THRESHOLD,
                    value = %raw,
                    error = %e,
                    "invalid CO₂ threshold policy; using median"
                );
                ThresholdPolicy::Median
            }),
            None => defaults.engine.co2_threshold,
        };

        let default_weights = DefaultWeights {
            co2: weight(&get, ENV_DEFAULT_CO2_WEIGHT, defaults.engine.default_weights.co2),
            cost: weight(&get, ENV_DEFAULT_COST_WEIGHT, defaults.engine.default_weights.cost),
        };

        Self {
            engine: EngineConfig {
                top_n,
                default_weights,
                co2_threshold,
            },
            model_manifest: get(ENV_MODEL_MANIFEST)
                .map(PathBuf::from)
                .unwrap_or(defaults.model_manifest),
            catalog_path: get(ENV_CATALOG_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog_path),
        }
    }
}

impl AppConfig {
    /// Reject settings no request could succeed with.
    ///
    /// `from_lookup` never produces these, but the fields are public and
    /// callers (CLI flags, embedding code) may set them directly.
    pub fn validate(&self) -> Result<(), ServiceError> {
        let engine = &self.engine;
        if engine.top_n == 0 {
            return Err(ServiceError::Config("top_n must be >= 1".into()));
        }
        let weights = [
            ("default co2 weight", engine.default_weights.co2),
            ("default cost weight", engine.default_weights.cost),
        ];
        for (name, w) in weights {
            if !(0.0..=1.0).contains(&w) {
                return Err(ServiceError::Config(format!(
                    "{name} must be within [0, 1], got {w}"
                )));
            }
        }
        match engine.co2_threshold {
            ThresholdPolicy::Quantile(q) if !(0.0..=1.0).contains(&q) => {
                return Err(ServiceError::Config(format!(
                    "quantile must be within [0, 1], got {q}"
                )));
            }
            ThresholdPolicy::Absolute(kg) if !(kg.is_finite() && kg >= 0.0) => {
                return Err(ServiceError::Config(format!(
                    "absolute CO₂ threshold must be >= 0, got {kg}"
                )));
            }
            _ => {}
        }
        for (name, path) in [
            ("model manifest", &self.model_manifest),
            ("catalog", &self.catalog_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ServiceError::Config(format!("{name} path is empty")));
            }
        }
        Ok(())
    }
}

fn weight(get: &impl Fn(&str) -> Option<String>, key: &str, default: f64) -> f64 {
    let Some(raw) = get(key) else {
        return default;
    };
    match raw.parse::<f64>() {
        Ok(w) if (0.0..=1.0).contains(&w) => w,
        _ => {
            warn!(key, value = %raw, "weight must be a number in [0, 1]; using default");
            default
        }
    }
}
