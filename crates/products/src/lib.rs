//! Product-side requirements for a packaging recommendation.
//!
//! Pure data + boundary validation (no IO). A `ProductSpec` is checked once
//! before any engine computation and is immutable for the rest of the call.

pub mod product;

pub use product::{ProductSpec, WeightOverride};
