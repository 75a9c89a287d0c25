//! Reflective Surfaces host
//!
//! Reads one JSON tool call per stdin line and answers with one JSON tool
//! output per stdout line. The literal line `tools` prints the tool manifest.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::{self, BufReader};
use tracing::info;

use reflective_surfaces::{host, telemetry};
use reflective_surfaces::{ServiceConfig, Taxonomy, TaxonomyLoader, ToolRegistry};

async fn load_taxonomy(config: &ServiceConfig) -> Result<Taxonomy> {
    match &config.taxonomy_path {
        Some(path) => TaxonomyLoader::new(path).load().await,
        None => Taxonomy::builtin().context("Built-in taxonomy failed validation"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServiceConfig::from_env();
    telemetry::init_logging(&config.log_filter)?;

    let taxonomy = Arc::new(load_taxonomy(&config).await?);
    let registry = ToolRegistry::new()
        .with_cache(config.cache_results)
        .with_cache_capacity(config.cache_capacity);
    registry.register_reflection_tools(taxonomy.clone()).await;

    let counts = taxonomy.counts();
    info!(
        "Serving {} tools over {} materials, {} geometries, {} environments (cache capacity {})",
        registry.tool_names().await.len(),
        counts.surface_materials,
        counts.geometry_factors,
        counts.environmental_contexts,
        registry.cache_capacity().await
    );

    let replies = host::serve(&registry, BufReader::new(io::stdin()), io::stdout()).await?;

    info!("Input closed after {} replies, shutting down", replies);
    Ok(())
}
