//! Built-in reflective surface vocabulary.

use serde_json::{json, Value};

use super::{
    EnvironmentRecord, GeometryRecord, MaterialRecord, OpticalBehavior, PhenomenonRecord,
    ReflectionTypeRecord, TaxonomyTables,
};

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

fn reflection_type(
    id: &str,
    name: &str,
    description: &str,
    (reflection_coefficient, clarity, distortion): (f64, f64, f64),
    keywords: &[&str],
    example_materials: &[&str],
    (preserves_angles, color_fidelity, depth_perception): (bool, &str, &str),
) -> ReflectionTypeRecord {
    ReflectionTypeRecord {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        reflection_coefficient,
        clarity,
        distortion,
        keywords: words(keywords),
        example_materials: words(example_materials),
        optical_behavior: OpticalBehavior {
            preserves_angles,
            color_fidelity: color_fidelity.to_string(),
            depth_perception: depth_perception.to_string(),
        },
    }
}

fn material(
    id: &str,
    name: &str,
    reflection_type: &str,
    (reflection_coefficient, roughness, ior, metallic): (f64, f64, f64, f64),
    color_tint: Option<&str>,
    keywords: &[&str],
) -> MaterialRecord {
    MaterialRecord {
        id: id.to_string(),
        name: name.to_string(),
        reflection_type: reflection_type.to_string(),
        reflection_coefficient,
        roughness,
        metallic,
        ior,
        color_tint: color_tint.map(str::to_string),
        keywords: words(keywords),
    }
}

fn phenomenon(
    id: &str,
    name: &str,
    description: &str,
    keywords: &[&str],
    applicable: &[&str],
    properties: Value,
) -> PhenomenonRecord {
    PhenomenonRecord {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        keywords: words(keywords),
        applicable_materials: words(applicable),
        properties: match properties {
            Value::Object(map) => map,
            _ => Default::default(),
        },
    }
}

fn geometry(
    id: &str,
    name: &str,
    curvature: &str,
    (reflection_distortion, coverage_uniformity): (f64, f64),
    keywords: &[&str],
    example_contexts: &[&str],
) -> GeometryRecord {
    GeometryRecord {
        id: id.to_string(),
        name: name.to_string(),
        curvature: curvature.to_string(),
        reflection_distortion,
        coverage_uniformity,
        keywords: words(keywords),
        example_contexts: words(example_contexts),
    }
}

fn environment(
    id: &str,
    name: &str,
    (light_intensity, contrast_ratio, color_temperature, reflection_visibility): (f64, f64, u32, f64),
    keywords: &[&str],
) -> EnvironmentRecord {
    EnvironmentRecord {
        id: id.to_string(),
        name: name.to_string(),
        light_intensity,
        contrast_ratio,
        color_temperature,
        reflection_visibility,
        keywords: words(keywords),
    }
}

pub(super) fn tables() -> TaxonomyTables {
    TaxonomyTables {
        reflection_types: vec![
            reflection_type(
                "specular", "Specular Reflection", "Mirror-like perfect reflections",
                (0.9, 1.0, 0.0),
                &["mirror-like", "sharp reflections", "perfect clarity", "distinct mirror image"],
                &["polished chrome", "mirror glass", "still water", "polished marble"],
                (true, "high", "accurate"),
            ),
            reflection_type(
                "glossy", "Glossy Reflection", "Clear but softer reflections with slight diffusion",
                (0.6, 0.7, 0.2),
                &["polished surface", "soft reflections", "gentle sheen", "semi-reflective"],
                &["polished wood", "glazed ceramic", "car paint", "wet pavement"],
                (true, "medium-high", "slightly softened"),
            ),
            reflection_type(
                "diffuse", "Diffuse Reflection", "Scattered light, no clear image reflection",
                (0.3, 0.2, 0.8),
                &["matte surface", "scattered light", "soft glow", "no distinct reflection"],
                &["unpolished metal", "frosted glass", "matte paint", "rough stone"],
                (false, "low", "minimal"),
            ),
            reflection_type(
                "caustic", "Caustic Patterns", "Focused light patterns from curved/refractive surfaces",
                (0.4, 0.3, 0.6),
                &["light patterns", "dancing reflections", "rippled caustics", "focused beams"],
                &["rippled water", "textured glass", "crystal facets", "ice surfaces"],
                (false, "varies", "complex"),
            ),
            reflection_type(
                "metallic", "Metallic Reflection", "Color-tinted reflections from metal surfaces",
                (0.8, 0.85, 0.1),
                &["metal sheen", "tinted reflections", "lustrous surface", "metallic gleam"],
                &["brushed aluminum", "copper", "brass", "gold", "silver"],
                (true, "tinted", "accurate with color cast"),
            ),
            reflection_type(
                "refractive", "Refractive Distortion", "Bent light paths through transparent media",
                (0.5, 0.6, 0.5),
                &["bent light", "distorted view", "magnification", "prismatic effects"],
                &["glass", "water", "crystal", "ice", "transparent plastic"],
                (false, "chromatic aberration possible", "warped"),
            ),
        ],
        materials: vec![
            material(
                "mirror_glass", "Mirror Glass", "specular", (0.95, 0.0, 1.52, 0.0), None,
                &["perfect mirror", "silvered glass", "clear reflection", "flawless surface"],
            ),
            material(
                "polished_chrome", "Polished Chrome", "metallic", (0.88, 0.05, 2.7, 1.0), Some("cool_neutral"),
                &["chrome finish", "metallic sheen", "industrial gleam", "steel-like"],
            ),
            material(
                "brushed_metal", "Brushed Metal", "glossy", (0.6, 0.25, 2.5, 0.9), Some("varies"),
                &["directional grain", "soft metal sheen", "textured surface", "industrial finish"],
            ),
            material(
                "still_water", "Still Water", "specular", (0.85, 0.02, 1.33, 0.0), Some("slight_blue"),
                &["glassy surface", "lake reflection", "mirror-like water", "perfect stillness"],
            ),
            material(
                "rippled_water", "Rippled Water", "caustic", (0.6, 0.4, 1.33, 0.0), Some("slight_blue"),
                &["dancing reflections", "wave patterns", "distorted mirror", "moving surface"],
            ),
            material(
                "frosted_glass", "Frosted Glass", "diffuse", (0.2, 0.8, 1.52, 0.0), None,
                &["translucent", "soft glow", "privacy glass", "diffused light"],
            ),
            material(
                "wet_pavement", "Wet Pavement", "glossy", (0.5, 0.3, 1.33, 0.0), Some("neutral_dark"),
                &["rain-slicked", "street reflections", "urban sheen", "puddle mirrors"],
            ),
            material(
                "polished_marble", "Polished Marble", "glossy", (0.7, 0.15, 1.55, 0.0), Some("varies"),
                &["stone gleam", "luxury surface", "veined reflection", "architectural polish"],
            ),
            material(
                "copper", "Copper", "metallic", (0.75, 0.1, 2.8, 1.0), Some("warm_orange"),
                &["copper gleam", "warm metallic", "reddish tint", "oxidized patina potential"],
            ),
            // Real part of gold's complex index; F0 stays well inside [0, 1].
            material(
                "gold", "Gold", "metallic", (0.8, 0.08, 0.47, 1.0), Some("warm_yellow"),
                &["golden luster", "warm reflections", "precious metal", "rich gleam"],
            ),
        ],
        phenomena: vec![
            phenomenon(
                "fresnel_effect", "Fresnel Effect", "Reflection intensity varies with viewing angle",
                &["angle-dependent reflection", "edge brightness", "viewing angle changes"],
                &["glass", "water", "plastics", "dielectrics"],
                // Normal-incidence intensity is for glass.
                json!({"angle_dependency": "strong", "intensity_at_grazing": 1.0, "intensity_at_normal": 0.04}),
            ),
            phenomenon(
                "chromatic_aberration", "Chromatic Aberration", "Color fringing in refractive materials",
                &["color fringing", "rainbow edges", "prismatic effect", "wavelength separation"],
                &["glass", "crystal", "water", "transparent_media"],
                json!({"effect_strength": "medium", "color_separation": ["red_shift_edges", "blue_shift_center"]}),
            ),
            phenomenon(
                "total_internal_reflection", "Total Internal Reflection",
                "Complete reflection at critical angle in denser media",
                &["fiber optic effect", "trapped light", "critical angle", "complete reflection"],
                &["glass", "water", "diamond", "transparent_solids"],
                // Degrees at the glass-air and water-air interfaces.
                json!({"critical_angle_glass": 41.8, "critical_angle_water": 48.6}),
            ),
            phenomenon(
                "subsurface_scattering", "Subsurface Scattering", "Light penetrates surface, scatters internally",
                &["internal glow", "translucent effect", "soft diffusion", "depth glow"],
                &["marble", "wax", "skin", "jade", "alabaster"],
                json!({"depth_penetration": "shallow", "color_shift": "subtle"}),
            ),
            phenomenon(
                "anisotropic_reflection", "Anisotropic Reflection",
                "Directional surface structure creates elongated highlights",
                &["brushed metal look", "directional grain", "linear highlights", "CD-like iridescence"],
                &["brushed_metal", "hair", "fabric", "wood_grain"],
                json!({"directionality": "strong", "highlight_shape": "elongated"}),
            ),
        ],
        geometries: vec![
            geometry(
                "flat", "Flat Surface", "none", (0.0, 1.0),
                &["planar reflection", "undistorted mirror", "parallel surfaces", "true image"],
                &["wall mirrors", "still water", "glass windows", "polished floors"],
            ),
            geometry(
                "convex", "Convex Surface", "positive", (0.6, 0.4),
                &["wide-angle view", "compressed reflection", "fisheye effect", "panoramic distortion"],
                &["spheres", "domes", "security mirrors", "watch crystals", "bubbles"],
            ),
            geometry(
                "concave", "Concave Surface", "negative", (0.7, 0.3),
                &["magnified reflection", "focused convergence", "inverted beyond focal point", "concentrated view"],
                &["spoons", "satellite dishes", "makeup mirrors", "parabolic reflectors"],
            ),
            geometry(
                "compound", "Compound Curvature", "complex", (0.8, 0.2),
                &["complex distortion", "variable magnification", "artistic warping", "multi-directional curves"],
                &["car bodies", "sculptures", "architectural features", "organic forms"],
            ),
            geometry(
                "faceted", "Faceted Surface", "discrete", (0.5, 0.5),
                &["fragmented reflections", "geometric patterns", "prismatic separation", "crystalline structure"],
                &["cut glass", "gemstones", "disco balls", "architectural glass", "crystal"],
            ),
        ],
        environments: vec![
            environment(
                "bright_daylight", "Bright Daylight", (1.0, 0.8, 5500, 0.9),
                &["harsh reflections", "high contrast", "glare potential", "sharp definition"],
            ),
            environment(
                "overcast", "Overcast Sky", (0.4, 0.3, 6500, 0.5),
                &["soft reflections", "low contrast", "diffused lighting", "gentle tones"],
            ),
            environment(
                "golden_hour", "Golden Hour", (0.6, 0.7, 3500, 0.85),
                &["warm reflections", "amber tones", "long shadows", "dramatic lighting"],
            ),
            environment(
                "artificial_indoor", "Artificial Indoor", (0.5, 0.6, 4000, 0.7),
                &["controlled lighting", "mixed sources", "ambient fill", "practical lights"],
            ),
            environment(
                "night_urban", "Night Urban", (0.2, 0.9, 3000, 0.8),
                &["neon reflections", "colored lights", "deep shadows", "artificial glow"],
            ),
        ],
    }
}
