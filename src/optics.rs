//! Optical Formulas
//!
//! Closed-form reflection approximations: Schlick's Fresnel term, the
//! composite visibility score and prominence banding.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ReflectionError, ReflectionResult};

/// Refractive index of the incident medium (air)
pub const AIR_IOR: f64 = 1.0;

/// Largest accepted viewing angle, measured from the surface normal
pub const MAX_VIEWING_ANGLE: f64 = 90.0;

/// Band edges for [`classify_prominence`]
pub const DOMINANT_ABOVE: f64 = 0.7;
pub const PROMINENT_FROM: f64 = 0.4;
pub const SUBTLE_FROM: f64 = 0.2;

/// Band edges for [`classify_fresnel_prominence`], all exclusive
pub const FRESNEL_DOMINANT_ABOVE: f64 = 0.8;
pub const FRESNEL_PROMINENT_ABOVE: f64 = 0.5;
pub const FRESNEL_SUBTLE_ABOVE: f64 = 0.2;

/// Qualitative strength of a reflection in the composition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Prominence {
    Minimal,
    Subtle,
    Prominent,
    Dominant,
}

impl Prominence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prominence::Minimal => "minimal",
            Prominence::Subtle => "subtle",
            Prominence::Prominent => "prominent",
            Prominence::Dominant => "dominant",
        }
    }

    /// Role the reflection plays in the image
    pub fn compositional_role(&self) -> &'static str {
        match self {
            Prominence::Dominant => "primary visual feature",
            Prominence::Prominent => "significant compositional element",
            Prominence::Subtle => "accent detail",
            Prominence::Minimal => "trace effect",
        }
    }
}

impl fmt::Display for Prominence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn check_viewing_angle(viewing_angle_degrees: f64) -> ReflectionResult<()> {
    if !viewing_angle_degrees.is_finite() || !(0.0..=MAX_VIEWING_ANGLE).contains(&viewing_angle_degrees) {
        return Err(ReflectionError::invalid(
            "viewing_angle",
            format!("{} is outside [0, 90] degrees", viewing_angle_degrees),
        ));
    }
    Ok(())
}

fn check_ior(ior: f64) -> ReflectionResult<()> {
    if !(ior.is_finite() && ior > 0.0) {
        return Err(ReflectionError::invalid("ior", format!("{} is not a positive finite index", ior)));
    }
    Ok(())
}

/// Reflectance at normal incidence, F0 = ((n1 - n2) / (n1 + n2))^2 with n1 = air
pub fn base_reflectance(ior: f64) -> f64 {
    let r0 = (AIR_IOR - ior) / (AIR_IOR + ior);
    (r0 * r0).clamp(0.0, 1.0)
}

/// Schlick's approximation of Fresnel reflectance.
///
/// `viewing_angle_degrees` is measured from the surface normal: 0 is head-on,
/// 90 is grazing. Angles outside `[0, 90]` are rejected.
pub fn fresnel_intensity(viewing_angle_degrees: f64, ior: f64) -> ReflectionResult<f64> {
    check_viewing_angle(viewing_angle_degrees)?;
    check_ior(ior)?;

    let f0 = base_reflectance(ior);
    let cos_theta = viewing_angle_degrees.to_radians().cos();
    let intensity = f0 + (1.0 - f0) * (1.0 - cos_theta).powi(5);
    Ok(intensity.clamp(0.0, 1.0))
}

/// Composite visibility: coefficient * fresnel * environment * (1 - distortion)
pub fn effective_visibility(
    reflection_coefficient: f64,
    fresnel_intensity: f64,
    environment_visibility: f64,
    geometry_distortion: f64,
) -> f64 {
    let unit = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
    let visibility = unit(reflection_coefficient)
        * unit(fresnel_intensity)
        * unit(environment_visibility)
        * (1.0 - unit(geometry_distortion));
    visibility.clamp(0.0, 1.0)
}

/// Map visibility onto four contiguous bands.
///
/// `(0.7, 1]` dominant, `[0.4, 0.7]` prominent, `[0.2, 0.4)` subtle,
/// everything below 0.2 (and NaN) minimal.
pub fn classify_prominence(effective_visibility: f64) -> Prominence {
    if effective_visibility > DOMINANT_ABOVE {
        Prominence::Dominant
    } else if effective_visibility >= PROMINENT_FROM {
        Prominence::Prominent
    } else if effective_visibility >= SUBTLE_FROM {
        Prominence::Subtle
    } else {
        Prominence::Minimal
    }
}

/// Band a raw Fresnel intensity, independent of material and lighting.
///
/// `(0.8, 1]` dominant, `(0.5, 0.8]` prominent, `(0.2, 0.5]` subtle,
/// everything else (and NaN) minimal.
pub fn classify_fresnel_prominence(fresnel_intensity: f64) -> Prominence {
    if fresnel_intensity > FRESNEL_DOMINANT_ABOVE {
        Prominence::Dominant
    } else if fresnel_intensity > FRESNEL_PROMINENT_ABOVE {
        Prominence::Prominent
    } else if fresnel_intensity > FRESNEL_SUBTLE_ABOVE {
        Prominence::Subtle
    } else {
        Prominence::Minimal
    }
}

/// Composition advice for a Fresnel band
pub fn fresnel_guidance(prominence: Prominence) -> &'static str {
    match prominence {
        Prominence::Dominant => "Strong reflection, nearly mirror-like. Use as primary visual element.",
        Prominence::Prominent => {
            "Visible reflection blending with surface. Balance reflection and material properties."
        }
        Prominence::Subtle => "Gentle reflection accent. Emphasize surface material over reflection.",
        Prominence::Minimal => {
            "Very weak reflection. Focus on material properties and transmitted/scattered light."
        }
    }
}

/// Fresnel intensity with the intermediate terms that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FresnelReport {
    pub viewing_angle: f64,
    pub ior: f64,
    pub f0_base_reflectance: f64,
    pub cos_theta: f64,
    pub fresnel_intensity: f64,
    pub prominence: Prominence,
    pub composition_guidance: &'static str,
}

impl FresnelReport {
    pub fn compute(viewing_angle_degrees: f64, ior: f64) -> ReflectionResult<Self> {
        let intensity = fresnel_intensity(viewing_angle_degrees, ior)?;
        let prominence = classify_fresnel_prominence(intensity);
        Ok(Self {
            viewing_angle: viewing_angle_degrees,
            ior,
            f0_base_reflectance: base_reflectance(ior),
            cos_theta: viewing_angle_degrees.to_radians().cos(),
            fresnel_intensity: intensity,
            prominence,
            composition_guidance: fresnel_guidance(prominence),
        })
    }
}
