//! Lazily-loaded predictor and catalog.
//!
//! The first caller pays for loading; concurrent first callers wait on the
//! same lock so loading happens exactly once. A failed load leaves the slot
//! empty and the next call retries.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use ecopack_catalog::{CatalogProvider, Material};
use ecopack_engine::Predictor;

use crate::catalog_file::JsonFileCatalog;
use crate::config::AppConfig;
use crate::error::ServiceError;
use crate::model::ModelManifest;

/// A loaded predictor plus the catalog snapshot it was loaded with.
pub struct LoadedModels {
    pub predictor: Arc<dyn Predictor>,
    pub catalog: Arc<[Material]>,
    pub model_name: Option<String>,
}

impl std::fmt::Debug for LoadedModels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModels")
            .field("model_name", &self.model_name)
            .field("materials", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

pub trait ModelLoader: Send + Sync + 'static {
    fn load(&self) -> Result<LoadedModels, ServiceError>;
}

/// Loads a model manifest and a JSON catalog from disk.
#[derive(Debug, Clone)]
pub struct FileModelLoader {
    manifest: PathBuf,
    catalog: JsonFileCatalog,
}

impl FileModelLoader {
    pub fn new(manifest: impl Into<PathBuf>, catalog: impl Into<PathBuf>) -> Self {
        Self {
            manifest: manifest.into(),
            catalog: JsonFileCatalog::new(catalog),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.model_manifest, &config.catalog_path)
    }
}

impl ModelLoader for FileModelLoader {
    fn load(&self) -> Result<LoadedModels, ServiceError> {
        let manifest = ModelManifest::load(&self.manifest)?;
        let catalog = self.catalog.snapshot()?;
        let model_name = manifest.name.clone();
        Ok(LoadedModels {
            predictor: Arc::new(manifest.into_predictor()),
            catalog,
            model_name,
        })
    }
}

#[derive(Debug)]
pub struct ModelRegistry<L> {
    loader: L,
    slot: Mutex<Option<Arc<LoadedModels>>>,
    loads: AtomicUsize,
}

impl<L: ModelLoader> ModelRegistry<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            slot: Mutex::new(None),
            loads: AtomicUsize::new(0),
        }
    }

    /// Loaded models, loading them on first use.
    pub fn get(&self) -> Result<Arc<LoadedModels>, ServiceError> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(loaded) = slot.as_ref() {
            return Ok(Arc::clone(loaded));
        }

        let attempt = self.loads.fetch_add(1, Ordering::SeqCst) + 1;
        match self.loader.load() {
            Ok(loaded) => {
                info!(
                    attempt,
                    model = loaded.model_name.as_deref().unwrap_or("unnamed"),
                    materials = loaded.catalog.len(),
                    "models loaded"
                );
                let loaded = Arc::new(loaded);
                *slot = Some(Arc::clone(&loaded));
                Ok(loaded)
            }
            Err(e) => {
                warn!(attempt, error = %e, "model load failed");
                Err(e)
            }
        }
    }

    /// Drop the cached models; the next `get` reloads.
    pub fn invalidate(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Number of load attempts so far.
    pub fn load_attempts(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}
