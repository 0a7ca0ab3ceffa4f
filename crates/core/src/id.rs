//! Strongly-typed identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a catalog material.
///
/// Catalog stores key materials by whatever they like (numeric ids, codes such
/// as `"MAT-0042"`), so this wraps the external key as an opaque string.
/// Deserializes from a JSON string or a non-negative integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawMaterialId", into = "String")]
pub struct MaterialId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMaterialId {
    Text(String),
    Number(u64),
}

impl TryFrom<RawMaterialId> for MaterialId {
    type Error = DomainError;

    fn try_from(raw: RawMaterialId) -> Result<Self, Self::Error> {
        match raw {
            RawMaterialId::Text(s) => Self::new(s),
            RawMaterialId::Number(n) => Ok(n.into()),
        }
    }
}

impl From<MaterialId> for String {
    fn from(id: MaterialId) -> Self {
        id.0
    }
}

impl MaterialId {
    /// Build an id, rejecting blank values.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_id("MaterialId: empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for MaterialId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MaterialId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<u64> for MaterialId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// Identifier of one recommendation run (used by history consumers).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecommendationId(Uuid);

impl RecommendationId {
    /// Time-ordered (UUIDv7), so ids sort by creation time.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RecommendationId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for RecommendationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
