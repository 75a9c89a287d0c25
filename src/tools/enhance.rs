//! Prompt Enhancement Tool

use async_trait::async_trait;
use serde_json::Value;

use super::{parse_params, schema_of, Tool, ToolOutput};
use crate::analysis::Analyzer;
use crate::enhance::{EnhancementRequest, Enhancer};
use crate::error::ReflectionResult;

/// Reflection vocabulary and parameters for composing an image prompt
pub struct PromptEnhancementTool {
    enhancer: Enhancer,
}

impl PromptEnhancementTool {
    pub fn new(analyzer: Analyzer) -> Self {
        Self { enhancer: Enhancer::new(analyzer) }
    }
}

#[async_trait]
impl Tool for PromptEnhancementTool {
    fn name(&self) -> String {
        "generate_reflection_prompt_enhancement".to_string()
    }

    fn description(&self) -> String {
        "Return deterministic reflection descriptors, optical parameters and lighting guidance for a \
         base image prompt. The caller composes the final prompt from this data. An optional \
         target_prominence is reported against the achieved prominence."
            .to_string()
    }

    fn parameters(&self) -> Value {
        schema_of::<EnhancementRequest>()
    }

    async fn execute(&self, params: Value) -> ReflectionResult<ToolOutput> {
        let request: EnhancementRequest = parse_params(params)?;
        let enhancement = self.enhancer.enhance(&request)?;

        let summary = match (enhancement.requested_prominence, enhancement.target_met) {
            (Some(requested), Some(false)) => format!(
                "{} descriptors; achieved {} prominence (requested {})",
                enhancement.primary_descriptors.len() + enhancement.secondary_descriptors.len(),
                enhancement.achieved_prominence,
                requested
            ),
            _ => format!(
                "{} descriptors; {} prominence",
                enhancement.primary_descriptors.len() + enhancement.secondary_descriptors.len(),
                enhancement.achieved_prominence
            ),
        };
        ToolOutput::structured(&enhancement, summary)
    }
}
