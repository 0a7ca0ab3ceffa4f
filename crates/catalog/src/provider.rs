use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::material::Material;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    #[error("malformed catalog: {0}")]
    Malformed(String),
}

/// Supplies the current material list.
///
/// Staleness and refresh policy belong to the provider. The engine only ever
/// sees an immutable snapshot.
pub trait CatalogProvider: Send + Sync + 'static {
    fn snapshot(&self) -> Result<Arc<[Material]>, CatalogError>;
}

impl<P: CatalogProvider + ?Sized> CatalogProvider for Arc<P> {
    fn snapshot(&self) -> Result<Arc<[Material]>, CatalogError> {
        (**self).snapshot()
    }
}

/// In-memory catalog for tests/dev.
///
/// `replace` swaps the whole snapshot; snapshots already handed out are unaffected.
#[derive(Debug)]
pub struct InMemoryCatalog {
    inner: RwLock<Arc<[Material]>>,
}

impl InMemoryCatalog {
    pub fn new(materials: Vec<Material>) -> Self {
        Self {
            inner: RwLock::new(materials.into()),
        }
    }

    pub fn replace(&self, materials: Vec<Material>) {
        let mut guard = self.inner.write().unwrap_or_else(|p| p.into_inner());
        *guard = materials.into();
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl CatalogProvider for InMemoryCatalog {
    fn snapshot(&self) -> Result<Arc<[Material]>, CatalogError> {
        let guard = self.inner.read().unwrap_or_else(|p| p.into_inner());
        Ok(Arc::clone(&guard))
    }
}
