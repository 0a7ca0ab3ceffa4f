use std::sync::Arc;

use tracing::{debug, info_span};

use ecopack_core::MaterialId;
use ecopack_engine::{
    EngineConfig, MaterialComparison, RecommendationEngine, RecommendationOutcome,
    RecommendationRequest,
};

use crate::config::AppConfig;
use crate::error::ServiceError;
use crate::history::{HistoryEntry, HistorySink};
use crate::registry::{FileModelLoader, ModelLoader, ModelRegistry};

/// Runs recommendations against the registry's models and records the
/// top result of every non-empty run.
#[derive(Debug)]
pub struct RecommendationService<L, S> {
    registry: Arc<ModelRegistry<L>>,
    config: EngineConfig,
    history: Arc<S>,
}

impl<S: HistorySink> RecommendationService<FileModelLoader, S> {
    /// Fails with [`ServiceError::Config`] when `config` does not validate.
    pub fn from_config(config: &AppConfig, history: Arc<S>) -> Result<Self, ServiceError> {
        config.validate()?;
        let registry = Arc::new(ModelRegistry::new(FileModelLoader::from_config(config)));
        Ok(Self::new(registry, config.engine.clone(), history))
    }
}

impl<L: ModelLoader, S: HistorySink> RecommendationService<L, S> {
    pub fn new(registry: Arc<ModelRegistry<L>>, config: EngineConfig, history: Arc<S>) -> Self {
        Self {
            registry,
            config,
            history,
        }
    }

    pub fn registry(&self) -> &ModelRegistry<L> {
        &self.registry
    }

    pub fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationOutcome, ServiceError> {
        let span = info_span!("recommend", category = %request.product.category);
        let _guard = span.enter();

        let outcome = self.run(request)?;
        if let Some(entry) = HistoryEntry::from_outcome(&request.product, &outcome) {
            self.history.record(entry);
        }
        Ok(outcome)
    }

    /// Compare 2 to 10 catalog materials for the same product.
    ///
    /// Infeasible and over-budget materials are kept and flagged; ids not in
    /// the catalog are listed in `missing`. Comparisons are not recorded in
    /// history.
    pub fn compare(
        &self,
        request: &RecommendationRequest,
        ids: &[MaterialId],
    ) -> Result<MaterialComparison, ServiceError> {
        let span = info_span!("compare", materials = ids.len());
        let _guard = span.enter();

        let loaded = self.registry.get()?;
        let engine = RecommendationEngine::with_config(&*loaded.predictor, self.config.clone());
        let comparison = engine.compare(&request.product, &loaded.catalog, ids)?;
        if !comparison.missing.is_empty() {
            debug!(missing = comparison.missing.len(), "compared ids not in catalog");
        }
        Ok(comparison)
    }

    fn run(&self, request: &RecommendationRequest) -> Result<RecommendationOutcome, ServiceError> {
        let loaded = self.registry.get()?;
        let engine = RecommendationEngine::with_config(&*loaded.predictor, self.config.clone());
        Ok(engine.recommend_request(request, &loaded.catalog)?)
    }
}
