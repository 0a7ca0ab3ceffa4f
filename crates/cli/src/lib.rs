//! `ecopack` command line.
//!
//! Reads a product spec as JSON and prints the recommendation (or a
//! comparison) as JSON on stdout. Logs go to stderr.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use ecopack_core::MaterialId;
use ecopack_engine::{MAX_COMPARED, RecommendationRequest, ThresholdPolicy};
use ecopack_infra::{AppConfig, RecommendationService, TracingHistorySink};
use ecopack_products::ProductSpec;

#[derive(Parser, Debug)]
#[command(name = "ecopack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Rank packaging materials by cost, CO₂ and fit", long_about = None)]
pub struct Cli {
    /// Model manifest (overrides ECOPACK_MODEL_MANIFEST)
    #[arg(global = true, long = "manifest", value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Material catalog (overrides ECOPACK_CATALOG_PATH)
    #[arg(global = true, long = "catalog", value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// CO₂ threshold policy: median, quantile:<q>, absolute:<kg>, none
    #[arg(global = true, long = "co2-threshold", value_name = "POLICY")]
    pub co2_threshold: Option<ThresholdPolicy>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recommend the best materials for a product
    Recommend {
        /// Product spec JSON file ("-" for stdin)
        #[arg(value_name = "PRODUCT")]
        product: PathBuf,

        /// Number of candidates to return
        #[arg(long = "top")]
        top_n: Option<usize>,
    },

    /// Compare 2 to 10 materials for the same product
    Compare {
        #[arg(value_name = "PRODUCT")]
        product: PathBuf,

        /// Catalog ids; infeasible materials are kept and flagged
        #[arg(value_name = "MATERIAL", required = true, num_args = 2..=MAX_COMPARED)]
        materials: Vec<MaterialId>,
    },
}

impl Cli {
    pub fn config(&self) -> AppConfig {
        let mut config = AppConfig::from_env();
        if let Some(path) = &self.manifest {
            config.model_manifest = path.clone();
        }
        if let Some(path) = &self.catalog {
            config.catalog_path = path.clone();
        }
        if let Some(policy) = self.co2_threshold {
            config.engine.co2_threshold = policy;
        }
        config
    }

    pub fn run(self) -> anyhow::Result<()> {
        let config = self.config();
        info!(
            manifest = %config.model_manifest.display(),
            catalog = %config.catalog_path.display(),
            co2_threshold = %config.engine.co2_threshold,
            "starting"
        );
        let service = RecommendationService::from_config(&config, Arc::new(TracingHistorySink))?;

        match self.command {
            Commands::Recommend { product, top_n } => {
                let request = RecommendationRequest {
                    product: read_product(&product)?,
                    top_n,
                };
                let outcome = service.recommend(&request)?;
                print_json(&outcome)
            }
            Commands::Compare { product, materials } => {
                let request = RecommendationRequest::from(read_product(&product)?);
                let comparison = service.compare(&request, &materials)?;
                print_json(&comparison)
            }
        }
    }
}

pub fn read_product(path: &Path) -> anyhow::Result<ProductSpec> {
    let raw = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).context("reading product spec from stdin")?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading product spec {}", path.display()))?
    };
    parse_product(&raw)
}

pub fn parse_product(raw: &str) -> anyhow::Result<ProductSpec> {
    serde_json::from_str(raw).context("parsing product spec")
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value)?;
    println!("{out}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_recommend_with_overrides() {
        let cli = Cli::try_parse_from([
            "ecopack",
            "--catalog",
            "/tmp/materials.json",
            "--co2-threshold",
            "quantile:0.8",
            "recommend",
            "product.json",
            "--top",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.co2_threshold, Some(ThresholdPolicy::Quantile(0.8)));
        let config = cli.config();
        assert_eq!(config.catalog_path, PathBuf::from("/tmp/materials.json"));
        assert_eq!(config.engine.co2_threshold, ThresholdPolicy::Quantile(0.8));
        match cli.command {
            Commands::Recommend { product, top_n } => {
                assert_eq!(product, PathBuf::from("product.json"));
                assert_eq!(top_n, Some(3));
            }
            other => panic!("expected Recommend, got {other:?}"),
        }
    }

    #[test]
    fn compare_takes_two_to_ten_materials() {
        let cli = Cli::try_parse_from(["ecopack", "compare", "p.json", "A", "B", "7"]).unwrap();
        match cli.command {
            Commands::Compare { materials, .. } => {
                assert_eq!(materials, vec![
                    MaterialId::new("A").unwrap(),
                    MaterialId::new("B").unwrap(),
                    MaterialId::from(7),
                ]);
            }
            other => panic!("expected Compare, got {other:?}"),
        }

        assert!(Cli::try_parse_from(["ecopack", "compare", "p.json", "A"]).is_err());
        let mut eleven = vec!["ecopack".to_string(), "compare".into(), "p.json".into()];
        eleven.extend((0..11).map(|i| i.to_string()));
        assert!(Cli::try_parse_from(eleven).is_err());
    }

    #[test]
    fn empty_catalog_path_is_a_config_error() {
        let mut cli = Cli::try_parse_from(["ecopack", "recommend", "p.json"]).unwrap();
        cli.catalog = Some(PathBuf::new());
        let err = cli.run().unwrap_err();
        assert!(err.to_string().contains("catalog path is empty"));
    }

    #[test]
    fn rejects_blank_material_ids() {
        assert!(Cli::try_parse_from(["ecopack", "compare", "p.json", "A", " "]).is_err());
    }

    #[test]
    fn product_json_fills_optional_fields() {
        let spec = parse_product(
            r#"{
                "weight_kg": 1.2, "fragility": 7, "moisture_required": 3,
                "oxygen_sensitivity": 2, "max_budget": 4.5, "shipping_distance_km": 800,
                "weights": { "co2": 0.7 }
            }"#,
        )
        .unwrap();

        assert_eq!(spec.effective_required_strength(), 7.0);
        assert_eq!(spec.weights.unwrap().cost, None);
        assert!(!spec.preferred_recyclable);
    }

    #[test]
    fn malformed_product_json_is_an_error() {
        let err = parse_product("{ \"weight_kg\": ").unwrap_err();
        assert!(err.to_string().contains("parsing product spec"));
    }
}
