//! Keyword Detection Tool
//!
//! Scans free text for taxonomy terms and suggests what is missing.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::{parse_params, schema_of, Tool, ToolOutput};
use crate::detect::KeywordDetector;
use crate::error::ReflectionResult;
use crate::taxonomy::Taxonomy;

#[derive(Debug, Deserialize, JsonSchema)]
struct DetectParams {
    /// Natural language prompt to scan
    prompt: String,
}

/// Extracts reflection vocabulary from a prompt
pub struct DetectKeywordsTool {
    detector: KeywordDetector,
}

impl DetectKeywordsTool {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self { detector: KeywordDetector::new(taxonomy) }
    }
}

#[async_trait]
impl Tool for DetectKeywordsTool {
    fn name(&self) -> String {
        "detect_reflection_keywords".to_string()
    }

    fn description(&self) -> String {
        "Extract reflection-related terms from a text prompt: materials, reflection types, geometries, \
         environments and optical phenomena. Pure whole-word matching; suggests candidates for \
         anything left unspecified."
            .to_string()
    }

    fn parameters(&self) -> Value {
        schema_of::<DetectParams>()
    }

    async fn execute(&self, params: Value) -> ReflectionResult<ToolOutput> {
        let params: DetectParams = parse_params(params)?;
        let detected = self.detector.detect(&params.prompt);
        let suggestions = self.detector.suggest(&params.prompt, &detected);

        let summary = if detected.has_reflection_content() {
            format!(
                "Detected {} materials, {} reflection types, {} geometries, {} environments, {} phenomena",
                detected.materials.len(),
                detected.reflection_types.len(),
                detected.geometries.len(),
                detected.environments.len(),
                detected.phenomena.len()
            )
        } else {
            "No reflection vocabulary detected".to_string()
        };

        Ok(ToolOutput::success(
            json!({
                "has_reflection_content": detected.has_reflection_content(),
                "detected": detected,
                "suggestions": suggestions,
            }),
            summary,
        ))
    }
}
