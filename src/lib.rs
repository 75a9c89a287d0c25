//! Reflective Surfaces
//!
//! Deterministic visual vocabulary for mirrors, glass, metal and liquid
//! reflections, built for language models composing image prompts:
//! - Validated, injectable taxonomy tables (built-in or loaded from JSON/YAML)
//! - Schlick Fresnel and composite visibility formulas
//! - Whole-word keyword detection over free text
//! - Scenario analysis, comparison and prompt enhancement
//! - Structured tool calling with JSON schemas
//! - A JSON-lines host loop over any async reader and writer

pub mod analysis;
pub mod compare;
pub mod config;
pub mod detect;
pub mod enhance;
pub mod error;
pub mod host;
pub mod optics;
pub mod taxonomy;
pub mod telemetry;
pub mod tools;

// Re-exports for convenience
pub use analysis::{Analyzer, ReflectionContextRequest, ReflectionContextResult};
pub use compare::{Comparator, LabeledRequest, ScenarioComparison};
pub use config::ServiceConfig;
pub use detect::{Detection, KeywordDetector};
pub use enhance::{EnhancementRequest, Enhancer, PromptEnhancement};
pub use error::{Category, ReflectionError, ReflectionResult};
pub use optics::Prominence;
pub use taxonomy::{Taxonomy, TaxonomyLoader};
pub use tools::{ToolCall, ToolOutput, ToolRegistry};
