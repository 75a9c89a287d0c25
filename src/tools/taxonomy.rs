//! Taxonomy Tools
//!
//! Raw table export and per-material lookups.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use super::{parse_params, schema_of, Tool, ToolOutput};
use crate::analysis::merge_keywords;
use crate::error::{Category, ReflectionResult};
use crate::taxonomy::Taxonomy;

#[derive(Debug, Deserialize, JsonSchema)]
struct TaxonomyParams {
    /// Restrict the export to one table
    #[serde(default)]
    category: Option<Category>,
}

/// Exports the reflection taxonomy
pub struct TaxonomyTool {
    taxonomy: Arc<Taxonomy>,
}

impl TaxonomyTool {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self { taxonomy }
    }
}

#[async_trait]
impl Tool for TaxonomyTool {
    fn name(&self) -> String {
        "get_reflection_taxonomy".to_string()
    }

    fn description(&self) -> String {
        "Get the complete taxonomy of reflection types, surface materials, optical phenomena, \
         geometry factors and environmental contexts, or a single table when 'category' is given."
            .to_string()
    }

    fn parameters(&self) -> Value {
        schema_of::<TaxonomyParams>()
    }

    async fn execute(&self, params: Value) -> ReflectionResult<ToolOutput> {
        let params: TaxonomyParams = parse_params(params)?;
        let tables = self.taxonomy.tables();

        let data = match params.category {
            None => serde_json::to_value(tables)?,
            Some(Category::Material) => json!({ "materials": tables.materials }),
            Some(Category::ReflectionType) => json!({ "reflection_types": tables.reflection_types }),
            Some(Category::Geometry) => json!({ "geometries": tables.geometries }),
            Some(Category::Environment) => json!({ "environments": tables.environments }),
            Some(Category::Phenomenon) => json!({ "phenomena": tables.phenomena }),
        };

        let counts = self.taxonomy.counts();
        let summary = format!(
            "Reflection taxonomy: {} reflection types, {} materials, {} phenomena, {} geometries, {} environments",
            counts.reflection_types,
            counts.surface_materials,
            counts.optical_phenomena,
            counts.geometry_factors,
            counts.environmental_contexts
        );
        Ok(ToolOutput::success(data, summary))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct MaterialParams {
    /// Material identifier (mirror_glass, polished_chrome, still_water, ...)
    #[serde(alias = "material")]
    material_id: String,
}

/// Full optical specification of one material
pub struct MaterialPropertiesTool {
    taxonomy: Arc<Taxonomy>,
}

impl MaterialPropertiesTool {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self { taxonomy }
    }
}

#[async_trait]
impl Tool for MaterialPropertiesTool {
    fn name(&self) -> String {
        "map_material_properties".to_string()
    }

    fn description(&self) -> String {
        "Get the optical properties of a surface material: reflection coefficient, roughness, \
         IOR, metallic value, its reflection behavior and image generation keywords."
            .to_string()
    }

    fn parameters(&self) -> Value {
        schema_of::<MaterialParams>()
    }

    async fn execute(&self, params: Value) -> ReflectionResult<ToolOutput> {
        let params: MaterialParams = parse_params(params)?;
        let material = self.taxonomy.material(&params.material_id)?;
        let behavior = self.taxonomy.reflection_type(&material.reflection_type)?;
        debug!("Mapped material {} -> {}", material.id, behavior.id);

        let data = json!({
            "material": material,
            "reflection_behavior": behavior,
            "composition_guidance": {
                "reflection_strength": material.reflection_coefficient,
                "surface_clarity": behavior.clarity,
                "distortion_level": behavior.distortion,
                "keywords": merge_keywords([material.keywords.as_slice(), behavior.keywords.as_slice()]),
            },
        });
        let summary = format!(
            "{} ({}): reflection {:.2}, roughness {:.2}, IOR {:.2}",
            material.name, behavior.name, material.reflection_coefficient, material.roughness, material.ior
        );
        Ok(ToolOutput::success(data, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taxonomy() -> Arc<Taxonomy> {
        Arc::new(Taxonomy::builtin().unwrap())
    }

    #[tokio::test]
    async fn test_full_export() {
        let tool = TaxonomyTool::new(taxonomy());
        let output = tool.execute(json!({})).await.unwrap();
        assert!(output.success);
        assert_eq!(output.data["materials"].as_array().unwrap().len(), 10);
        assert_eq!(output.data["geometries"][0]["id"], "flat");
    }

    #[tokio::test]
    async fn test_single_table_export() {
        let tool = TaxonomyTool::new(taxonomy());
        let output = tool.execute(json!({"category": "environment"})).await.unwrap();
        assert!(output.data.get("materials").is_none());
        assert_eq!(output.data["environments"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_material_properties() {
        let tool = MaterialPropertiesTool::new(taxonomy());
        let output = tool.execute(json!({"material_id": "copper"})).await.unwrap();
        assert_eq!(output.data["material"]["ior"], 2.8);
        assert_eq!(output.data["reflection_behavior"]["id"], "metallic");
        assert_eq!(output.data["composition_guidance"]["keywords"].as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_unknown_material() {
        let tool = MaterialPropertiesTool::new(taxonomy());
        let err = tool.execute(json!({"material_id": "adamantium"})).await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }
}
