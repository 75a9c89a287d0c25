//! Prompt Enhancement
//!
//! Packages an analysis into structured vocabulary for a downstream language
//! model. No prose is composed here.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{
    default_viewing_angle, Analyzer, LightingGuidance, OpticalProperties, ReflectionContextRequest,
};
use crate::error::ReflectionResult;
use crate::optics::Prominence;

const PRIMARY_DESCRIPTORS: usize = 4;
const SECONDARY_DESCRIPTORS: usize = 4;

fn default_geometry() -> String {
    "flat".to_string()
}

fn default_environment() -> String {
    "bright_daylight".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EnhancementRequest {
    /// Original prompt describing the scene
    pub base_prompt: String,
    /// Reflective surface material identifier
    #[serde(alias = "material_id")]
    pub material: String,
    #[serde(default = "default_geometry")]
    pub geometry: String,
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Degrees from the surface normal, 0 to 90
    #[serde(default = "default_viewing_angle")]
    pub viewing_angle: f64,
    /// Desired prominence; reported against the achieved one, never enforced
    #[serde(default)]
    pub target_prominence: Option<Prominence>,
    /// Optional style descriptor such as "photorealistic" or "cinematic"
    #[serde(default)]
    pub style_modifier: Option<String>,
}

impl EnhancementRequest {
    pub fn new(base_prompt: impl Into<String>, context: ReflectionContextRequest) -> Self {
        Self {
            base_prompt: base_prompt.into(),
            material: context.material,
            geometry: context.geometry,
            environment: context.environment,
            viewing_angle: context.viewing_angle,
            target_prominence: None,
            style_modifier: None,
        }
    }

    pub fn with_target(mut self, target: Prominence) -> Self {
        self.target_prominence = Some(target);
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style_modifier = Some(style.into());
        self
    }

    pub fn context(&self) -> ReflectionContextRequest {
        ReflectionContextRequest::new(&self.material, &self.geometry, &self.environment, self.viewing_angle)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnicalParameters {
    pub material: String,
    pub geometry: String,
    pub environment: String,
    pub viewing_angle: f64,
    pub optical: OpticalProperties,
    pub lighting: LightingGuidance,
}

/// Structured guidance for composing an enhanced image prompt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptEnhancement {
    pub base_prompt: String,
    pub primary_descriptors: Vec<String>,
    pub secondary_descriptors: Vec<String>,
    pub keywords: Vec<String>,
    pub reflection_keywords: Vec<String>,
    pub effective_visibility: f64,
    pub fresnel_intensity: f64,
    pub distortion_index: f64,
    pub achieved_prominence: Prominence,
    pub compositional_role: &'static str,
    pub requested_prominence: Option<Prominence>,
    /// Present only when a target was requested
    pub target_met: Option<bool>,
    pub technical_parameters: TechnicalParameters,
    pub style_modifier: Option<String>,
}

pub struct Enhancer {
    analyzer: Analyzer,
}

impl Enhancer {
    pub fn new(analyzer: Analyzer) -> Self {
        Self { analyzer }
    }

    pub fn enhance(&self, request: &EnhancementRequest) -> ReflectionResult<PromptEnhancement> {
        let analysis = self.analyzer.analyze(&request.context())?;

        let primary: Vec<String> = analysis.keywords.iter().take(PRIMARY_DESCRIPTORS).cloned().collect();
        let secondary: Vec<String> = analysis
            .keywords
            .iter()
            .skip(PRIMARY_DESCRIPTORS)
            .take(SECONDARY_DESCRIPTORS)
            .cloned()
            .collect();

        let target_met = request.target_prominence.map(|t| t == analysis.prominence);
        if target_met == Some(false) {
            debug!(
                "Requested {:?} prominence, achieved {}",
                request.target_prominence, analysis.prominence
            );
        }

        Ok(PromptEnhancement {
            base_prompt: request.base_prompt.clone(),
            primary_descriptors: primary,
            secondary_descriptors: secondary,
            effective_visibility: analysis.effective_visibility,
            fresnel_intensity: analysis.fresnel_intensity,
            distortion_index: analysis.distortion_index,
            achieved_prominence: analysis.prominence,
            compositional_role: analysis.compositional_role,
            requested_prominence: request.target_prominence,
            target_met,
            technical_parameters: TechnicalParameters {
                material: request.material.clone(),
                geometry: request.geometry.clone(),
                environment: request.environment.clone(),
                viewing_angle: request.viewing_angle,
                optical: analysis.optical,
                lighting: analysis.lighting,
            },
            keywords: analysis.keywords,
            reflection_keywords: analysis.reflection_keywords,
            style_modifier: request.style_modifier.clone(),
        })
    }
}
