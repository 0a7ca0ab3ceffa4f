use serde::{Deserialize, Serialize};
use thiserror::Error;

use ecopack_catalog::CatalogError;
use ecopack_engine::{EngineError, ErrorKind, PredictorError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<PredictorError> for ServiceError {
    fn from(value: PredictorError) -> Self {
        Self::Engine(value.into())
    }
}

impl ServiceError {
    pub fn kind(&self) -> ServiceErrorKind {
        match self {
            ServiceError::Engine(e) => match e.kind() {
                ErrorKind::Validation => ServiceErrorKind::Validation,
                ErrorKind::PredictorUnavailable => ServiceErrorKind::PredictorUnavailable,
            },
            ServiceError::Catalog(_) => ServiceErrorKind::CatalogUnavailable,
            ServiceError::Config(_) => ServiceErrorKind::Config,
        }
    }
}

/// Machine-readable error kind at the service boundary.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceErrorKind {
    Validation,
    PredictorUnavailable,
    CatalogUnavailable,
    Config,
}
