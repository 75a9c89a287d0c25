//! Tool System Module
//!
//! Exposes every reflection operation as a named tool with a JSON schema,
//! so a host can hand them to a language model and dispatch its calls.

mod analyze;
mod compare;
mod detect;
mod enhance;
mod fresnel;
mod info;
mod taxonomy;

pub use analyze::AnalyzeContextTool;
pub use compare::CompareScenariosTool;
pub use detect::DetectKeywordsTool;
pub use enhance::PromptEnhancementTool;
pub use fresnel::FresnelTool;
pub use info::ServerInfoTool;
pub use taxonomy::{MaterialPropertiesTool, TaxonomyTool};

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::analysis::Analyzer;
use crate::error::{ReflectionError, ReflectionResult};
use crate::taxonomy::Taxonomy;

/// Output from a tool execution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolOutput {
    /// Whether the tool execution was successful
    pub success: bool,
    /// The output data
    pub data: Value,
    /// Human-readable summary of the output
    pub summary: String,
    /// Optional error message if success is false
    pub error: Option<String>,
}

impl ToolOutput {
    /// Create a successful output
    pub fn success(data: impl Into<Value>, summary: impl Into<String>) -> Self {
        Self {
            success: true,
            data: data.into(),
            summary: summary.into(),
            error: None,
        }
    }

    /// Serialize `data` into a successful output
    pub fn structured<T: Serialize>(data: &T, summary: impl Into<String>) -> ReflectionResult<Self> {
        Ok(Self::success(serde_json::to_value(data)?, summary))
    }

    /// Create a failed output
    pub fn failure(error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            success: false,
            data: Value::Null,
            summary: format!("Error: {}", error),
            error: Some(error),
        }
    }

    /// Failed output carrying the error's kind and offending field as data
    pub fn from_error(error: &ReflectionError) -> Self {
        Self {
            data: error.to_value(),
            ..Self::failure(error.to_string())
        }
    }
}

/// A tool call request parsed from LLM output
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub struct ToolCall {
    /// Name of the tool to call
    pub name: String,
    /// Parameters for the tool
    #[serde(default)]
    pub parameters: Value,
}

/// Deserialize tool parameters into their typed request
pub(crate) fn parse_params<T: DeserializeOwned>(params: Value) -> ReflectionResult<T> {
    let params = if params.is_null() { json!({}) } else { params };
    serde_json::from_value(params).map_err(|e| ReflectionError::MalformedRequest(e.to_string()))
}

/// JSON schema of a parameter type
pub(crate) fn schema_of<T: JsonSchema>() -> Value {
    serde_json::to_value(schemars::schema_for!(T)).unwrap_or_default()
}

/// Trait for operations a language model can call
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the unique name of the tool
    fn name(&self) -> String;

    /// Get a description of what the tool does
    fn description(&self) -> String;

    /// Get the JSON schema for the tool's parameters
    fn parameters(&self) -> Value;

    /// Execute the tool with the given parameters
    async fn execute(&self, params: Value) -> ReflectionResult<ToolOutput>;
}

/// Default number of memoized outputs kept by a registry
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Sliding window of memoized outputs; the oldest entry is evicted first
#[derive(Debug)]
struct MemoCache {
    entries: HashMap<String, ToolOutput>,
    order: VecDeque<String>,
    capacity: usize,
}

impl MemoCache {
    fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    fn get(&self, key: &str) -> Option<&ToolOutput> {
        self.entries.get(key)
    }

    fn insert(&mut self, key: String, output: ToolOutput) {
        if self.capacity == 0 || self.entries.contains_key(&key) {
            return;
        }
        while self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, output);
    }

    fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.order.len() > capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Registry for available tools with memoized results
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
    cache: Mutex<MemoCache>,
    cache_enabled: bool,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
            cache: Mutex::new(MemoCache::new(DEFAULT_CACHE_CAPACITY)),
            cache_enabled: true,
        }
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Bound the memo cache to `capacity` entries
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache.get_mut().set_capacity(capacity);
        self
    }

    /// Registry holding every reflection tool over `taxonomy`
    pub async fn with_reflection_tools(taxonomy: Arc<Taxonomy>) -> Self {
        let registry = Self::new();
        registry.register_reflection_tools(taxonomy).await;
        registry
    }

    pub async fn register_reflection_tools(&self, taxonomy: Arc<Taxonomy>) {
        let analyzer = Analyzer::new(taxonomy.clone());
        self.register_instance(TaxonomyTool::new(taxonomy.clone())).await;
        self.register_instance(MaterialPropertiesTool::new(taxonomy.clone())).await;
        self.register_instance(FresnelTool::new(taxonomy.clone())).await;
        self.register_instance(AnalyzeContextTool::new(analyzer.clone())).await;
        self.register_instance(DetectKeywordsTool::new(taxonomy.clone())).await;
        self.register_instance(PromptEnhancementTool::new(analyzer.clone())).await;
        self.register_instance(CompareScenariosTool::new(analyzer)).await;
        self.register_instance(ServerInfoTool::new(taxonomy)).await;
        info!("Registered {} reflection tools", self.tools.read().await.len());
    }

    /// Register a tool instance
    pub async fn register_instance<T: Tool + 'static>(&self, tool: T) {
        let mut tools = self.tools.write().await;
        tools.insert(tool.name(), Arc::new(tool));
    }

    /// Get all tool names, sorted
    pub async fn tool_names(&self) -> Vec<String> {
        let tools = self.tools.read().await;
        let mut names: Vec<String> = tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Name, description and parameter schema of every tool
    pub async fn manifest(&self) -> Value {
        let tools = self.tools.read().await;
        let mut names: Vec<&String> = tools.keys().collect();
        names.sort();
        Value::Array(
            names
                .into_iter()
                .map(|name| {
                    let tool = &tools[name];
                    json!({
                        "name": name,
                        "description": tool.description(),
                        "parameters": tool.parameters(),
                    })
                })
                .collect(),
        )
    }

    /// Get a specific tool by name
    pub async fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let tools = self.tools.read().await;
        tools.get(name).cloned()
    }

    /// Execute a tool call with caching
    pub async fn execute(&self, call: &ToolCall) -> ReflectionResult<ToolOutput> {
        let cache_key = format!("{}:{}", call.name, serde_json::to_string(&call.parameters)?);

        if self.cache_enabled {
            let cache = self.cache.lock().await;
            if let Some(output) = cache.get(&cache_key) {
                debug!("Cache Hit for tool: {}", call.name);
                return Ok(output.clone());
            }
        }

        let result = match self.get_tool(&call.name).await {
            Some(tool) => tool.execute(call.parameters.clone()).await?,
            None => ToolOutput::failure(format!("Unknown tool: {}", call.name)),
        };

        if self.cache_enabled && result.success {
            let mut cache = self.cache.lock().await;
            cache.insert(cache_key, result.clone());
        }

        Ok(result)
    }

    /// Execute a call, folding any error into a failed output
    pub async fn dispatch(&self, call: &ToolCall) -> ToolOutput {
        match self.execute(call).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Tool '{}' rejected request: {}", call.name, e);
                ToolOutput::from_error(&e)
            }
        }
    }

    /// Execute multiple tool calls in parallel
    pub async fn execute_parallel(&self, calls: &[ToolCall]) -> Vec<ReflectionResult<ToolOutput>> {
        let futures = calls.iter().map(|call| self.execute(call));
        futures_util::future::join_all(futures).await
    }

    /// Clear the tool cache
    pub async fn clear_cache(&self) {
        let mut cache = self.cache.lock().await;
        cache.clear();
    }

    pub async fn cached_entries(&self) -> usize {
        self.cache.lock().await.len()
    }

    pub async fn cache_capacity(&self) -> usize {
        self.cache.lock().await.capacity
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
