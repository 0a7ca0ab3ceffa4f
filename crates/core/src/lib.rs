//! `ecopack-core`: shared building blocks.
//!
//! This crate contains **pure** primitives (no I/O, no model access).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::{Entity, first_duplicate_id};
pub use error::{DomainError, DomainResult};
pub use id::{MaterialId, RecommendationId};
pub use value_object::ValueObject;
