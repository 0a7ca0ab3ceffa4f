//! Adapters around the recommendation engine.
//!
//! Everything with side effects lives here: reading configuration from the
//! environment, loading model manifests and catalog files, the lazily-loaded
//! model registry, and the history sink fed with each run's top result.

pub mod catalog_file;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod registry;
pub mod service;

pub use catalog_file::JsonFileCatalog;
pub use config::AppConfig;
pub use error::{ServiceError, ServiceErrorKind};
pub use history::{HistoryEntry, HistorySink, InMemoryHistorySink, TracingHistorySink};
pub use model::{LinearModel, LinearPredictor, ModelManifest};
pub use registry::{FileModelLoader, LoadedModels, ModelLoader, ModelRegistry};
pub use service::RecommendationService;
