//! Server Info Tool

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use super::{Tool, ToolOutput};
use crate::error::ReflectionResult;
use crate::taxonomy::Taxonomy;

const CAPABILITIES: &[&str] = &[
    "Fresnel equation calculations",
    "Material optical property lookup",
    "Multi-factor reflection analysis",
    "Keyword detection and extraction",
    "Comparative scenario analysis",
    "Image prompt enhancement",
];

/// Service metadata and taxonomy coverage
pub struct ServerInfoTool {
    taxonomy: Arc<Taxonomy>,
}

impl ServerInfoTool {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self { taxonomy }
    }
}

#[async_trait]
impl Tool for ServerInfoTool {
    fn name(&self) -> String {
        "get_server_info".to_string()
    }

    fn description(&self) -> String {
        "Get service metadata, taxonomy coverage and capabilities.".to_string()
    }

    fn parameters(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _params: Value) -> ReflectionResult<ToolOutput> {
        let data = json!({
            "server": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Systematic visual vocabulary for reflective surface aesthetics",
            "taxonomy_coverage": self.taxonomy.counts(),
            "key_capabilities": CAPABILITIES,
        });
        Ok(ToolOutput::success(
            data,
            format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_server_info() {
        let tool = ServerInfoTool::new(Arc::new(Taxonomy::builtin().unwrap()));
        let output = tool.execute(Value::Null).await.unwrap();
        assert_eq!(output.data["server"], "reflective_surfaces");
        assert_eq!(output.data["taxonomy_coverage"]["surface_materials"], 10);
        assert_eq!(output.data["key_capabilities"].as_array().unwrap().len(), 6);
    }
}
