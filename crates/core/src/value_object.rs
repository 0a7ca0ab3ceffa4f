//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. A product
/// specification or a pair of predictions has no identity of its own: two with
/// the same attributes are interchangeable.
///
/// - **Value Object**: `ProductSpec`, `PredictionPair`, resolved weights
/// - **Entity**: `Material` (identified by `MaterialId`)
///
/// Immutability is what lets a single recommendation call share its inputs
/// across threads without locking.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
