//! Error Model
//!
//! Typed failures shared by every reflection operation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use thiserror::Error;

/// Taxonomy table a record or identifier belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Material,
    ReflectionType,
    Geometry,
    Environment,
    Phenomenon,
}

impl Category {
    /// All categories in table order
    pub const ALL: [Category; 5] = [
        Category::Material,
        Category::ReflectionType,
        Category::Geometry,
        Category::Environment,
        Category::Phenomenon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Material => "material",
            Category::ReflectionType => "reflection_type",
            Category::Geometry => "geometry",
            Category::Environment => "environment",
            Category::Phenomenon => "phenomenon",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a reflection operation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReflectionError {
    /// Identifier is not present in its taxonomy table
    #[error("unknown {category} '{id}'")]
    NotFound { category: Category, id: String },

    /// A field holds a value outside its documented domain
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Payload could not be parsed into the expected request shape
    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

pub type ReflectionResult<T> = Result<T, ReflectionError>;

impl ReflectionError {
    pub fn not_found(category: Category, id: impl Into<String>) -> Self {
        Self::NotFound { category, id: id.into() }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput { field: field.into(), reason: reason.into() }
    }

    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InvalidInput { .. } => "invalid_input",
            Self::MalformedRequest(_) => "malformed_request",
        }
    }

    /// Structured description for hosts that forward errors as data
    pub fn to_value(&self) -> Value {
        match self {
            Self::NotFound { category, id } => json!({
                "kind": self.kind(),
                "category": category,
                "id": id,
            }),
            Self::InvalidInput { field, reason } => json!({
                "kind": self.kind(),
                "field": field,
                "reason": reason,
            }),
            Self::MalformedRequest(reason) => json!({
                "kind": self.kind(),
                "reason": reason,
            }),
        }
    }
}

impl From<serde_json::Error> for ReflectionError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedRequest(e.to_string())
    }
}
