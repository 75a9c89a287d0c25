//! Context Analysis Tool
//!
//! Runs the full material, geometry and environment analysis for one viewing angle.

use async_trait::async_trait;
use serde_json::Value;

use super::{parse_params, schema_of, Tool, ToolOutput};
use crate::analysis::{Analyzer, ReflectionContextRequest};
use crate::error::ReflectionResult;

/// Full reflection analysis of a material, geometry, environment and angle
pub struct AnalyzeContextTool {
    analyzer: Analyzer,
}

impl AnalyzeContextTool {
    pub fn new(analyzer: Analyzer) -> Self {
        Self { analyzer }
    }
}

#[async_trait]
impl Tool for AnalyzeContextTool {
    fn name(&self) -> String {
        "analyze_reflection_context".to_string()
    }

    fn description(&self) -> String {
        "Analyze a complete reflection scenario. Combines material properties, surface geometry, \
         environmental lighting and viewing angle into visibility, distortion, prominence and \
         image generation keywords."
            .to_string()
    }

    fn parameters(&self) -> Value {
        schema_of::<ReflectionContextRequest>()
    }

    async fn execute(&self, params: Value) -> ReflectionResult<ToolOutput> {
        let request: ReflectionContextRequest = parse_params(params)?;
        let result = self.analyzer.analyze(&request)?;
        let summary = format!(
            "{} on {} geometry in {}: visibility {:.3}, distortion {:.2}, {} ({})",
            request.material,
            request.geometry,
            request.environment,
            result.effective_visibility,
            result.distortion_index,
            result.prominence,
            result.compositional_role
        );
        ToolOutput::structured(&result, summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Taxonomy;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_analyze_tool() {
        let tool = AnalyzeContextTool::new(Analyzer::new(Arc::new(Taxonomy::builtin().unwrap())));
        let output = tool
            .execute(json!({
                "material_id": "mirror_glass",
                "geometry": "flat",
                "environment": "golden_hour",
                "viewing_angle": 30.0
            }))
            .await
            .unwrap();

        assert!(output.success);
        assert_eq!(output.data["distortion_index"], 0.0);
        assert_eq!(output.data["scenario"]["material"], "mirror_glass");
        assert_eq!(output.data["prominence"], "minimal");
        assert_eq!(output.data["keywords"][0], "perfect mirror");
    }
}
