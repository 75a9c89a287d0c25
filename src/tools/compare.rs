//! Scenario Comparison Tool
//!
//! Analyzes several labeled scenarios and ranks them by effective visibility.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use super::{parse_params, schema_of, Tool, ToolOutput};
use crate::analysis::Analyzer;
use crate::compare::{self, Comparator, ScenarioSpec};
use crate::error::ReflectionResult;

/// Scenarios arrive either as a JSON array or as a string holding one
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(untagged)]
enum ScenarioPayload {
    List(Vec<ScenarioSpec>),
    Encoded(String),
}

#[derive(Debug, Deserialize, JsonSchema)]
struct CompareParams {
    scenarios: ScenarioPayload,
}

/// Side-by-side comparison of labeled reflection scenarios
pub struct CompareScenariosTool {
    comparator: Comparator,
}

impl CompareScenariosTool {
    pub fn new(analyzer: Analyzer) -> Self {
        Self { comparator: Comparator::new(analyzer) }
    }
}

#[async_trait]
impl Tool for CompareScenariosTool {
    fn name(&self) -> String {
        "compare_reflection_scenarios".to_string()
    }

    fn description(&self) -> String {
        "Compare labeled reflection configurations side by side. Each scenario needs label, \
         material_id, geometry, environment and optionally viewing_angle. Returns per-scenario \
         analyses in input order, a visibility ranking and qualitative deltas between ranks."
            .to_string()
    }

    fn parameters(&self) -> Value {
        schema_of::<CompareParams>()
    }

    async fn execute(&self, params: Value) -> ReflectionResult<ToolOutput> {
        let params: CompareParams = parse_params(params)?;
        let requests = match params.scenarios {
            ScenarioPayload::List(specs) => compare::from_specs(specs)?,
            ScenarioPayload::Encoded(payload) => compare::parse_scenarios(&payload)?,
        };

        let comparison = self.comparator.compare(&requests)?;
        let summary = comparison
            .ranking
            .iter()
            .map(|r| format!("{}. {} ({:.3}, {})", r.rank, r.label, r.effective_visibility, r.prominence))
            .collect::<Vec<_>>()
            .join("\n");
        ToolOutput::structured(&comparison, format!("Scenario ranking:\n{}", summary))
    }
}
