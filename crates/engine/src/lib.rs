//! `ecopack-engine`
//!
//! **Responsibility:** constraint-aware, multi-objective ranking of packaging
//! materials for one product.
//!
//! Pipeline (one synchronous call, no shared mutable state):
//! 1. `features`: merge the product spec into each catalog row, derive gaps.
//! 2. `prediction`: ask the injected `Predictor` for per-unit cost and CO₂.
//! 3. `feasibility`: budget + emissions pre-screen with a budget-only fallback.
//! 4. `scoring`: survivor-relative indices, weighted suitability, ranking score.
//! 5. `explanation`: tag-style reason and per-dimension sentences.
//! 6. `ranking`: sequence the above, stable sort, truncate to top-N.
//!
//! The crate performs no IO. Model loading and catalog access live in `ecopack-infra`.

pub mod comparison;
pub mod config;
pub mod error;
pub mod explanation;
pub mod feasibility;
pub mod features;
pub mod prediction;
pub mod ranking;
pub mod scoring;

pub use comparison::{
    CandidateComparison, ComparedMaterial, MAX_COMPARED, MaterialComparison, compare_candidates,
};
pub use config::{DefaultWeights, EngineConfig, ThresholdPolicy};
pub use error::{EngineError, ErrorKind, PredictorError};
pub use explanation::Explanation;
pub use feasibility::{Feasibility, FeasibleSet};
pub use features::{ConstraintFlags, InferenceRecord, MISSING_CATEGORY};
pub use prediction::{
    PredictionPair, Predictor, RawPredictions, Regressor, RegressorPair, TablePredictor,
};
pub use ranking::{
    RecommendationEngine, RecommendationOutcome, RecommendationRequest, ScoredCandidate,
};
pub use scoring::{CandidateScores, ResolvedWeights};
