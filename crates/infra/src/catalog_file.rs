use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use ecopack_catalog::{CatalogError, CatalogProvider, Material};
use ecopack_core::first_duplicate_id;

/// Catalog stored as a JSON array of materials.
///
/// Every snapshot re-reads the file; caching is the registry's job.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Parse a catalog document. Blank/duplicate ids are rejected.
pub fn parse_catalog(json: &str) -> Result<Vec<Material>, CatalogError> {
    let materials: Vec<Material> =
        serde_json::from_str(json).map_err(|e| CatalogError::Malformed(e.to_string()))?;

    if let Some(id) = first_duplicate_id(&materials) {
        return Err(CatalogError::Malformed(format!("duplicate material id '{id}'")));
    }
    Ok(materials)
}

impl CatalogProvider for JsonFileCatalog {
    fn snapshot(&self) -> Result<Arc<[Material]>, CatalogError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            CatalogError::Unavailable(format!("cannot read {}: {e}", self.path.display()))
        })?;
        let materials = parse_catalog(&raw)?;
        debug!(path = %self.path.display(), materials = materials.len(), "catalog loaded");
        Ok(materials.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        { "id": "M-1", "name": "Kraft paper", "material_type": "Paper",
          "strength_rating": 4, "cost_per_kg": 1.2, "co2_per_kg": 0.9,
          "biodegradable": true, "recyclable": true },
        { "id": "M-2", "name": "PET film" }
    ]"#;

    fn temp_file(contents: &str) -> PathBuf {
        let name = format!("ecopack-catalog-{}.json", uuid::Uuid::now_v7());
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn reads_materials_with_optional_attributes() {
        let path = temp_file(CATALOG);
        let snapshot = JsonFileCatalog::new(&path).snapshot().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].material_type.as_deref(), Some("Paper"));
        assert!(snapshot[0].is_biodegradable());
        assert_eq!(snapshot[1].cost_per_kg, None);
        assert!(!snapshot[1].is_recyclable());
    }

    #[test]
    fn missing_file_is_unavailable() {
        let err = JsonFileCatalog::new("/nonexistent/ecopack/materials.json")
            .snapshot()
            .unwrap_err();
        match err {
            CatalogError::Unavailable(_) => {}
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_ids_are_malformed() {
        let err = parse_catalog(r#"[{"id":"A","name":"x"},{"id":"A","name":"y"}]"#).unwrap_err();
        assert_eq!(err, CatalogError::Malformed("duplicate material id 'A'".into()));
    }

    #[test]
    fn blank_id_is_malformed() {
        let err = parse_catalog(r#"[{"id":"  ","name":"x"}]"#).unwrap_err();
        assert!(matches!(err, CatalogError::Malformed(_)));
    }
}
