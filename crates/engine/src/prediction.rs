//! Prediction adapter: narrow boundary to the external cost/CO₂ regressors.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use ecopack_core::{MaterialId, ValueObject};

use crate::error::{EngineError, PredictorError};
use crate::features::InferenceRecord;

/// A single-target regressor (per-unit cost *or* per-unit CO₂).
///
/// Must be a pure function of its input: same records, same output.
pub trait Regressor: Send + Sync {
    fn predict(&self, records: &[InferenceRecord]) -> Result<Vec<f64>, PredictorError>;
}

impl<R: Regressor + ?Sized> Regressor for Arc<R> {
    fn predict(&self, records: &[InferenceRecord]) -> Result<Vec<f64>, PredictorError> {
        (**self).predict(records)
    }
}

/// Raw regressor output, one value per record (before clamping).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPredictions {
    pub cost: Vec<f64>,
    pub co2: Vec<f64>,
}

/// The predictor capability injected into the engine.
///
/// Constructed once at process start and shared by reference; the engine never
/// reaches for a global model handle.
pub trait Predictor: Send + Sync {
    fn predict(&self, records: &[InferenceRecord]) -> Result<RawPredictions, PredictorError>;
}

impl<P: Predictor + ?Sized> Predictor for Arc<P> {
    fn predict(&self, records: &[InferenceRecord]) -> Result<RawPredictions, PredictorError> {
        (**self).predict(records)
    }
}

impl<P: Predictor + ?Sized> Predictor for &P {
    fn predict(&self, records: &[InferenceRecord]) -> Result<RawPredictions, PredictorError> {
        (**self).predict(records)
    }
}

/// Two independent regressors exposed as one `Predictor`.
#[derive(Debug, Clone)]
pub struct RegressorPair<C, E> {
    pub cost: C,
    pub co2: E,
}

impl<C, E> RegressorPair<C, E> {
    pub fn new(cost: C, co2: E) -> Self {
        Self { cost, co2 }
    }
}

impl<C: Regressor, E: Regressor> Predictor for RegressorPair<C, E> {
    fn predict(&self, records: &[InferenceRecord]) -> Result<RawPredictions, PredictorError> {
        let cost = self.cost.predict(records).map_err(|e| e.context("cost regressor"))?;
        let co2 = self.co2.predict(records).map_err(|e| e.context("co2 regressor"))?;
        Ok(RawPredictions { cost, co2 })
    }
}

/// Predicted per-unit cost (USD) and CO₂ (kg) for one material. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionPair {
    pub cost: f64,
    pub co2: f64,
}

impl ValueObject for PredictionPair {}

/// Run the predictor and post-process into one pair per record.
///
/// Negative values clamp to 0; NaN, infinite and missing values become 0.
/// An unavailable predictor is fatal and propagates as
/// [`EngineError::PredictorUnavailable`].
pub fn predict_pairs<P: Predictor + ?Sized>(
    predictor: &P,
    records: &[InferenceRecord],
) -> Result<Vec<PredictionPair>, EngineError> {
    let raw = predictor.predict(records)?;

    for (target, values) in [("cost", &raw.cost), ("co2", &raw.co2)] {
        if values.len() != records.len() {
            warn!(
                target_name = target,
                expected = records.len(),
                got = values.len(),
                "predictor returned a mismatched number of values; missing entries treated as 0"
            );
        }
    }

    Ok((0..records.len())
        .map(|i| PredictionPair {
            cost: sanitize(raw.cost.get(i).copied()),
            co2: sanitize(raw.co2.get(i).copied()),
        })
        .collect())
}

fn sanitize(v: Option<f64>) -> f64 {
    match v {
        Some(x) if x.is_finite() => x.max(0.0),
        _ => 0.0,
    }
}

/// Lookup-table predictor for tests/dev.
///
/// Materials absent from the table predict NaN (and therefore 0 after
/// post-processing).
#[derive(Debug, Clone, Default)]
pub struct TablePredictor {
    table: HashMap<MaterialId, PredictionPair>,
}

impl TablePredictor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: MaterialId, cost: f64, co2: f64) -> Self {
        self.table.insert(id, PredictionPair { cost, co2 });
        self
    }

    pub fn insert(&mut self, id: MaterialId, cost: f64, co2: f64) {
        self.table.insert(id, PredictionPair { cost, co2 });
    }
}

impl Predictor for TablePredictor {
    fn predict(&self, records: &[InferenceRecord]) -> Result<RawPredictions, PredictorError> {
        let mut out = RawPredictions {
            cost: Vec::with_capacity(records.len()),
            co2: Vec::with_capacity(records.len()),
        };
        for r in records {
            let pair = self.table.get(&r.material_id);
            out.cost.push(pair.map_or(f64::NAN, |p| p.cost));
            out.co2.push(pair.map_or(f64::NAN, |p| p.co2));
        }
        Ok(out)
    }
}
