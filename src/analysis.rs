//! Reflection Context Analysis
//!
//! Resolves a material/geometry/environment triple against the taxonomy and
//! combines it with the viewing angle into one reflection profile.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::error::ReflectionResult;
use crate::optics::{self, Prominence};
use crate::taxonomy::Taxonomy;

pub(crate) fn default_viewing_angle() -> f64 {
    45.0
}

/// One reflection scenario to analyze
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReflectionContextRequest {
    /// Surface material identifier (mirror_glass, polished_chrome, ...)
    #[serde(alias = "material_id")]
    pub material: String,
    /// Surface geometry identifier (flat, convex, concave, compound, faceted)
    pub geometry: String,
    /// Lighting context identifier (bright_daylight, overcast, golden_hour, ...)
    pub environment: String,
    /// Degrees from the surface normal, 0 (head-on) to 90 (grazing)
    #[serde(default = "default_viewing_angle")]
    pub viewing_angle: f64,
}

impl ReflectionContextRequest {
    pub fn new(
        material: impl Into<String>,
        geometry: impl Into<String>,
        environment: impl Into<String>,
        viewing_angle: f64,
    ) -> Self {
        Self {
            material: material.into(),
            geometry: geometry.into(),
            environment: environment.into(),
            viewing_angle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpticalProperties {
    pub reflection_coefficient: f64,
    pub roughness: f64,
    pub metallic: f64,
    pub ior: f64,
    pub color_tint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightingGuidance {
    /// Kelvin
    pub color_temperature: u32,
    pub intensity: f64,
    pub contrast_ratio: f64,
}

/// Fully resolved reflection profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReflectionContextResult {
    pub scenario: ReflectionContextRequest,
    pub reflection_type: String,
    pub fresnel_intensity: f64,
    pub base_reflectance: f64,
    pub effective_visibility: f64,
    pub distortion_index: f64,
    pub clarity: f64,
    pub prominence: Prominence,
    pub compositional_role: &'static str,
    /// Material, then geometry, then environment keywords, first occurrence kept
    pub keywords: Vec<String>,
    pub reflection_keywords: Vec<String>,
    pub optical: OpticalProperties,
    pub lighting: LightingGuidance,
}

/// Concatenate keyword lists, dropping later duplicates
pub fn merge_keywords<'a>(lists: impl IntoIterator<Item = &'a [String]>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for keyword in lists.into_iter().flatten() {
        if seen.insert(keyword.as_str()) {
            merged.push(keyword.clone());
        }
    }
    merged
}

/// Combines taxonomy lookups with the optical formulas
#[derive(Clone)]
pub struct Analyzer {
    taxonomy: Arc<Taxonomy>,
}

impl Analyzer {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &Arc<Taxonomy> {
        &self.taxonomy
    }

    pub fn analyze(&self, request: &ReflectionContextRequest) -> ReflectionResult<ReflectionContextResult> {
        let material = self.taxonomy.material(&request.material)?;
        let geometry = self.taxonomy.geometry(&request.geometry)?;
        let environment = self.taxonomy.environment(&request.environment)?;
        let reflection_type = self.taxonomy.reflection_type(&material.reflection_type)?;

        let fresnel = optics::fresnel_intensity(request.viewing_angle, material.ior)?;
        let distortion_index = geometry.reflection_distortion.clamp(0.0, 1.0);
        let effective_visibility = optics::effective_visibility(
            material.reflection_coefficient,
            fresnel,
            environment.reflection_visibility,
            distortion_index,
        );
        let prominence = optics::classify_prominence(effective_visibility);

        debug!(
            "Analyzed {}/{}/{} at {}°: fresnel {:.3}, visibility {:.3} ({})",
            material.id, geometry.id, environment.id, request.viewing_angle,
            fresnel, effective_visibility, prominence
        );

        Ok(ReflectionContextResult {
            scenario: request.clone(),
            reflection_type: reflection_type.id.clone(),
            fresnel_intensity: fresnel,
            base_reflectance: optics::base_reflectance(material.ior),
            effective_visibility,
            distortion_index,
            clarity: (reflection_type.clarity * (1.0 - distortion_index)).clamp(0.0, 1.0),
            prominence,
            compositional_role: prominence.compositional_role(),
            keywords: merge_keywords([
                material.keywords.as_slice(),
                geometry.keywords.as_slice(),
                environment.keywords.as_slice(),
            ]),
            reflection_keywords: reflection_type.keywords.clone(),
            optical: OpticalProperties {
                reflection_coefficient: material.reflection_coefficient,
                roughness: material.roughness,
                metallic: material.metallic,
                ior: material.ior,
                color_tint: material.color_tint.clone(),
            },
            lighting: LightingGuidance {
                color_temperature: environment.color_temperature,
                intensity: environment.light_intensity,
                contrast_ratio: environment.contrast_ratio,
            },
        })
    }
}
