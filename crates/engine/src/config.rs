use core::str::FromStr;

use serde::{Deserialize, Serialize};

use ecopack_core::DomainError;

/// Objective weights used when the caller supplies none (or omits a key).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefaultWeights {
    pub co2: f64,
    pub cost: f64,
}

impl Default for DefaultWeights {
    fn default() -> Self {
        Self {
            co2: 0.50,
            cost: 0.35,
        }
    }
}

/// How the emissions cutoff of the feasibility filter is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", content = "value", rename_all = "snake_case")]
pub enum ThresholdPolicy {
    /// Median predicted CO₂ across the whole catalog.
    #[default]
    Median,
    /// Quantile `q` in [0, 1] of predicted CO₂ (linear interpolation).
    Quantile(f64),
    /// Fixed ceiling in kg CO₂ per unit.
    Absolute(f64),
    /// No emissions cutoff; budget only.
    Disabled,
}

impl FromStr for ThresholdPolicy {
    type Err = DomainError;

    /// Accepts `median`, `quantile:<q>`, `absolute:<kg>`, `none`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let (name, arg) = match s.split_once(':') {
            Some((n, a)) => (n.trim(), Some(a.trim())),
            None => (s.as_str(), None),
        };

        let parse_arg = |arg: Option<&str>| -> Result<f64, DomainError> {
            let raw = arg.ok_or_else(|| {
                DomainError::validation(format!("threshold policy '{name}' needs a value"))
            })?;
            let v: f64 = raw.parse().map_err(|_| {
                DomainError::validation(format!("threshold value '{raw}' is not a number"))
            })?;
            if !v.is_finite() {
                return Err(DomainError::validation("threshold value must be finite"));
            }
            Ok(v)
        };

        match (name, arg) {
            ("median", None) => Ok(ThresholdPolicy::Median),
            ("none" | "disabled", None) => Ok(ThresholdPolicy::Disabled),
            ("quantile", a) => {
                let q = parse_arg(a)?;
                if !(0.0..=1.0).contains(&q) {
                    return Err(DomainError::validation("quantile must be within [0, 1]"));
                }
                Ok(ThresholdPolicy::Quantile(q))
            }
            ("absolute", a) => {
                let kg = parse_arg(a)?;
                if kg < 0.0 {
                    return Err(DomainError::validation("absolute threshold must be >= 0"));
                }
                Ok(ThresholdPolicy::Absolute(kg))
            }
            _ => Err(DomainError::validation(format!(
                "unknown threshold policy '{s}'"
            ))),
        }
    }
}

impl core::fmt::Display for ThresholdPolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ThresholdPolicy::Median => f.write_str("median"),
            ThresholdPolicy::Quantile(q) => write!(f, "quantile:{q}"),
            ThresholdPolicy::Absolute(kg) => write!(f, "absolute:{kg}"),
            ThresholdPolicy::Disabled => f.write_str("none"),
        }
    }
}

/// Tunables of the recommendation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of candidates returned (callers may override per request).
    pub top_n: usize,
    pub default_weights: DefaultWeights,
    pub co2_threshold: ThresholdPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            default_weights: DefaultWeights::default(),
            co2_threshold: ThresholdPolicy::Median,
        }
    }
}
