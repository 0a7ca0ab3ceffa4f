use serde::{Deserialize, Serialize};
use thiserror::Error;

use ecopack_core::DomainError;

/// Failure reported by an external regressor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PredictorError {
    #[error("predictor unavailable: {0}")]
    Unavailable(String),
}

impl PredictorError {
    /// Prefix the failure reason, keeping a single "predictor unavailable" label.
    pub fn context(self, what: &str) -> Self {
        match self {
            PredictorError::Unavailable(reason) => {
                PredictorError::Unavailable(format!("{what}: {reason}"))
            }
        }
    }
}

/// Failure of a recommendation call.
///
/// "No feasible material" is *not* an error: it is an `Ok` outcome with an
/// empty candidate list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Malformed request, rejected before any computation.
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// The cost or CO₂ regressor could not be reached/loaded. Fatal for the call.
    #[error("predictor unavailable: {reason}")]
    PredictorUnavailable { reason: String },
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(DomainError::validation(msg))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Validation(_) => ErrorKind::Validation,
            EngineError::PredictorUnavailable { .. } => ErrorKind::PredictorUnavailable,
        }
    }
}

impl From<PredictorError> for EngineError {
    fn from(value: PredictorError) -> Self {
        match value {
            PredictorError::Unavailable(reason) => EngineError::PredictorUnavailable { reason },
        }
    }
}

/// Machine-readable error kind for callers that map failures to responses.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    PredictorUnavailable,
}
