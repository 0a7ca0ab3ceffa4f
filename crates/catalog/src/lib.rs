//! Packaging material catalog model.
//!
//! The catalog itself lives outside this workspace (files, databases). This crate
//! only defines the typed `Material` record the engine reads and the provider
//! boundary that supplies a snapshot of it.

pub mod material;
pub mod provider;

pub use material::Material;
pub use provider::{CatalogError, CatalogProvider, InMemoryCatalog};
