use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use super::{Taxonomy, TaxonomyTables};

/// Reads substitute taxonomy tables from JSON or YAML files
pub struct TaxonomyLoader {
    path: PathBuf,
}

enum Format {
    Json,
    Yaml,
}

impl TaxonomyLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> Result<Format> {
        match self.path.extension().and_then(|s| s.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            other => Err(anyhow::anyhow!(
                "Unsupported taxonomy format {:?} for {:?} (expected .json, .yaml or .yml)",
                other,
                self.path
            )),
        }
    }

    /// Load and validate the tables at `path`
    pub async fn load(&self) -> Result<Taxonomy> {
        let format = self.format()?;
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read taxonomy file {:?}", self.path))?;

        let tables: TaxonomyTables = match format {
            Format::Json => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse taxonomy JSON {:?}", self.path))?,
            Format::Yaml => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse taxonomy YAML {:?}", self.path))?,
        };

        let taxonomy = Taxonomy::new(tables)
            .with_context(|| format!("Taxonomy file {:?} failed validation", self.path))?;
        info!("Loaded taxonomy from {:?}", self.path);
        Ok(taxonomy)
    }

    /// Write `taxonomy` to `path` in the format its extension names
    pub async fn save(&self, taxonomy: &Taxonomy) -> Result<()> {
        let content = match self.format()? {
            Format::Json => serde_json::to_string_pretty(taxonomy.tables())?,
            Format::Yaml => serde_yaml::to_string(taxonomy.tables())?,
        };
        fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_json_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let loader = TaxonomyLoader::new(dir.path().join("taxonomy.json"));
        let builtin = Taxonomy::builtin().unwrap();

        loader.save(&builtin).await.unwrap();
        let loaded = loader.load().await.unwrap();

        for category in crate::error::Category::ALL {
            assert_eq!(builtin.identifiers(category), loaded.identifiers(category));
        }
        let gold = loaded.material("gold").unwrap();
        assert!((gold.ior - 0.47).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_yaml_substitute_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.yaml");
        let yaml = r#"
reflection_types:
  - id: specular
    name: Specular
    description: Mirror
    reflection_coefficient: 0.9
    clarity: 1.0
    distortion: 0.0
    keywords: [mirror-like]
    optical_behavior:
      preserves_angles: true
      color_fidelity: high
      depth_perception: accurate
materials:
  - id: obsidian
    name: Obsidian
    reflection_type: specular
    reflection_coefficient: 0.5
    roughness: 0.1
    metallic: 0.0
    ior: 1.49
    keywords: [volcanic glass]
geometries:
  - id: flat
    name: Flat
    curvature: none
    reflection_distortion: 0.0
    coverage_uniformity: 1.0
    keywords: [planar]
environments:
  - id: studio
    name: Studio
    light_intensity: 0.7
    contrast_ratio: 0.5
    color_temperature: 5600
    reflection_visibility: 1.0
    keywords: [softbox]
"#;
        tokio::fs::write(&path, yaml).await.unwrap();

        let taxonomy = TaxonomyLoader::new(&path).load().await.unwrap();
        assert_eq!(taxonomy.material("obsidian").unwrap().ior, 1.49);
        assert!(taxonomy.phenomena().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_tables_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let loader = TaxonomyLoader::new(dir.path().join("bad.json"));
        let mut tables = Taxonomy::builtin().unwrap().tables().clone();
        tables.environments[0].reflection_visibility = 2.0;
        tokio::fs::write(loader.path(), serde_json::to_string(&tables).unwrap()).await.unwrap();

        let err = loader.load().await.unwrap_err();
        assert!(format!("{:#}", err).contains("reflection_visibility"));
    }

    #[tokio::test]
    async fn test_unknown_extension() {
        let loader = TaxonomyLoader::new("taxonomy.toml");
        assert!(loader.load().await.is_err());
    }
}
