//! Fresnel Tool
//!
//! Angle-dependent reflectance for a single material, with composition guidance.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::{parse_params, schema_of, Tool, ToolOutput};
use crate::error::ReflectionResult;
use crate::optics::FresnelReport;
use crate::taxonomy::Taxonomy;

fn default_material() -> String {
    "mirror_glass".to_string()
}

#[derive(Debug, Deserialize, JsonSchema)]
struct FresnelParams {
    /// Angle from the surface normal: 0 is perpendicular, 90 is grazing
    #[serde(alias = "viewing_angle")]
    viewing_angle_degrees: f64,
    /// Surface material supplying the IOR (default: mirror_glass)
    #[serde(default = "default_material", alias = "material")]
    material_id: String,
}

/// Schlick's Fresnel approximation for one material and angle
pub struct FresnelTool {
    taxonomy: Arc<Taxonomy>,
}

impl FresnelTool {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self { taxonomy }
    }
}

#[async_trait]
impl Tool for FresnelTool {
    fn name(&self) -> String {
        "compute_fresnel_intensity".to_string()
    }

    fn description(&self) -> String {
        "Calculate reflection intensity (0.0-1.0) for a viewing angle using Schlick's approximation \
         F = F0 + (1 - F0)(1 - cos θ)^5, with F0 derived from the material's index of refraction."
            .to_string()
    }

    fn parameters(&self) -> Value {
        schema_of::<FresnelParams>()
    }

    async fn execute(&self, params: Value) -> ReflectionResult<ToolOutput> {
        let params: FresnelParams = parse_params(params)?;
        let material = self.taxonomy.material(&params.material_id)?;
        let report = FresnelReport::compute(params.viewing_angle_degrees, material.ior)?;

        let mut data = serde_json::to_value(report)?;
        data["material"] = Value::String(material.id.clone());

        let summary = format!(
            "{} at {}°: Fresnel intensity {:.3} ({})",
            material.name, report.viewing_angle, report.fresnel_intensity, report.prominence
        );
        Ok(ToolOutput::success(data, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool() -> FresnelTool {
        FresnelTool::new(Arc::new(Taxonomy::builtin().unwrap()))
    }

    #[tokio::test]
    async fn test_default_material() {
        let output = tool().execute(json!({"viewing_angle_degrees": 0.0})).await.unwrap();
        assert_eq!(output.data["material"], "mirror_glass");
        let f = output.data["fresnel_intensity"].as_f64().unwrap();
        let f0 = output.data["f0_base_reflectance"].as_f64().unwrap();
        assert!((f - f0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_grazing_glass_uses_fresnel_bands() {
        let output = tool().execute(json!({"viewing_angle_degrees": 86.6})).await.unwrap();
        let f = output.data["fresnel_intensity"].as_f64().unwrap();
        assert!(f > 0.7 && f <= 0.8, "{}", f);
        assert_eq!(output.data["prominence"], "prominent");
        assert_eq!(
            output.data["composition_guidance"],
            "Visible reflection blending with surface. Balance reflection and material properties."
        );
    }

    #[tokio::test]
    async fn test_rejects_out_of_range_angle() {
        let err = tool().execute(json!({"viewing_angle": 135.0, "material_id": "gold"})).await.unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
    }

    #[tokio::test]
    async fn test_unknown_material_is_not_defaulted() {
        let err = tool()
            .execute(json!({"viewing_angle": 30.0, "material_id": "plasma"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[tokio::test]
    async fn test_missing_angle_is_malformed() {
        let err = tool().execute(json!({"material_id": "gold"})).await.unwrap_err();
        assert_eq!(err.kind(), "malformed_request");
    }
}
