//! Recommendation history.
//!
//! History entries are a record of what was recommended, kept apart from the
//! engine so a failing sink can never change a ranking.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use ecopack_core::{MaterialId, RecommendationId};
use ecopack_engine::{MISSING_CATEGORY, RecommendationOutcome, ResolvedWeights};
use ecopack_products::ProductSpec;

/// The top candidate of one recommendation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: RecommendationId,
    pub recorded_at: DateTime<Utc>,
    pub product_category: String,
    pub material_id: MaterialId,
    pub material_name: String,
    pub ranking_score: f64,
    pub suitability_score: f64,
    pub predicted_cost: f64,
    pub predicted_co2: f64,
    pub weights: ResolvedWeights,
}

impl HistoryEntry {
    /// `None` when the outcome has no candidates; empty runs are not recorded.
    pub fn from_outcome(product: &ProductSpec, outcome: &RecommendationOutcome) -> Option<Self> {
        let best = outcome.best()?;
        Some(Self {
            id: RecommendationId::new(),
            recorded_at: Utc::now(),
            product_category: match product.category.trim() {
                "" => MISSING_CATEGORY.to_string(),
                category => category.to_string(),
            },
            material_id: best.material_id.clone(),
            material_name: best.material_name.clone(),
            ranking_score: best.ranking_score,
            suitability_score: best.suitability_score,
            predicted_cost: best.prediction.cost,
            predicted_co2: best.prediction.co2,
            weights: outcome.weights,
        })
    }
}

pub trait HistorySink: Send + Sync + 'static {
    fn record(&self, entry: HistoryEntry);
}

/// In-memory sink for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryHistorySink {
    inner: Mutex<Vec<HistoryEntry>>,
}

impl InMemoryHistorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<HistoryEntry> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl HistorySink for InMemoryHistorySink {
    fn record(&self, entry: HistoryEntry) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

/// Emits each entry as a structured log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHistorySink;

impl HistorySink for TracingHistorySink {
    fn record(&self, entry: HistoryEntry) {
        info!(
            recommendation_id = %entry.id,
            product_category = %entry.product_category,
            material_id = %entry.material_id,
            material_name = %entry.material_name,
            ranking_score = entry.ranking_score,
            suitability_score = entry.suitability_score,
            predicted_cost = entry.predicted_cost,
            predicted_co2 = entry.predicted_co2,
            "recommendation recorded"
        );
    }
}
