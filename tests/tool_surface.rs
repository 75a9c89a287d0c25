use serde_json::json;
use std::sync::Arc;

use reflective_surfaces::{Taxonomy, ToolCall, ToolRegistry};

async fn registry() -> ToolRegistry {
    ToolRegistry::with_reflection_tools(Arc::new(Taxonomy::builtin().unwrap())).await
}

fn call(name: &str, parameters: serde_json::Value) -> ToolCall {
    ToolCall { name: name.to_string(), parameters }
}

#[tokio::test]
async fn registers_every_reflection_tool() {
    let registry = registry().await;
    assert_eq!(
        registry.tool_names().await,
        vec![
            "analyze_reflection_context",
            "compare_reflection_scenarios",
            "compute_fresnel_intensity",
            "detect_reflection_keywords",
            "generate_reflection_prompt_enhancement",
            "get_reflection_taxonomy",
            "get_server_info",
            "map_material_properties",
        ]
    );

    let manifest = registry.manifest().await;
    let entries = manifest.as_array().unwrap();
    assert_eq!(entries.len(), 8);
    for entry in entries {
        assert!(entry["description"].as_str().is_some_and(|d| !d.is_empty()));
        assert!(entry["parameters"].is_object(), "{}", entry["name"]);
    }
}

#[tokio::test]
async fn analyze_round_trip_through_dispatch() {
    let registry = registry().await;
    let output = registry
        .dispatch(&call(
            "analyze_reflection_context",
            json!({
                "material_id": "mirror_glass",
                "geometry": "flat",
                "environment": "golden_hour",
                "viewing_angle": 30.0
            }),
        ))
        .await;

    assert!(output.success, "{:?}", output.error);
    assert_eq!(output.data["distortion_index"], 0.0);
    assert_eq!(output.data["reflection_type"], "specular");
    assert_eq!(output.data["prominence"], "minimal");
}

#[tokio::test]
async fn unknown_identifier_surfaces_as_structured_failure() {
    let registry = registry().await;
    let output = registry
        .dispatch(&call(
            "analyze_reflection_context",
            json!({"material": "vantablack", "geometry": "flat", "environment": "overcast"}),
        ))
        .await;

    assert!(!output.success);
    assert_eq!(output.data["kind"], "not_found");
    assert_eq!(output.data["category"], "material");
    assert_eq!(output.data["id"], "vantablack");
    assert_eq!(registry.cached_entries().await, 0);
}

#[tokio::test]
async fn missing_fields_are_malformed() {
    let registry = registry().await;
    let output = registry
        .dispatch(&call("analyze_reflection_context", json!({"material": "gold"})))
        .await;
    assert!(!output.success);
    assert_eq!(output.data["kind"], "malformed_request");
}

#[tokio::test]
async fn fresnel_tool_validates_angle() {
    let registry = registry().await;

    let ok = registry
        .dispatch(&call("compute_fresnel_intensity", json!({"viewing_angle_degrees": 0.0})))
        .await;
    assert!(ok.success);
    assert_eq!(ok.data["fresnel_intensity"], ok.data["f0_base_reflectance"]);

    let bad = registry
        .dispatch(&call("compute_fresnel_intensity", json!({"viewing_angle_degrees": 120.0})))
        .await;
    assert!(!bad.success);
    assert_eq!(bad.data["kind"], "invalid_input");
    assert_eq!(bad.data["field"], "viewing_angle");
}

#[tokio::test]
async fn compare_accepts_list_and_encoded_payloads() {
    let registry = registry().await;
    let scenarios = json!([
        {"label": "hero", "material_id": "polished_chrome", "geometry": "flat", "environment": "bright_daylight", "viewing_angle": 80.0},
        {"label": "background", "material_id": "brushed_metal", "geometry": "compound", "environment": "overcast"}
    ]);

    let listed = registry
        .dispatch(&call("compare_reflection_scenarios", json!({"scenarios": scenarios.clone()})))
        .await;
    let encoded = registry
        .dispatch(&call("compare_reflection_scenarios", json!({"scenarios": scenarios.to_string()})))
        .await;

    assert!(listed.success, "{:?}", listed.error);
    assert_eq!(listed.data, encoded.data);
    assert_eq!(listed.data["results"][0]["label"], "hero");
    assert_eq!(listed.data["results"][1]["label"], "background");
    assert_eq!(listed.data["ranking"][0]["rank"], 1);
    assert_eq!(listed.data["deltas"].as_array().unwrap().len(), 1);

    let empty = registry
        .dispatch(&call("compare_reflection_scenarios", json!({"scenarios": []})))
        .await;
    assert_eq!(empty.data["kind"], "invalid_input");

    let garbled = registry
        .dispatch(&call("compare_reflection_scenarios", json!({"scenarios": "[{\"label\""})))
        .await;
    assert_eq!(garbled.data["kind"], "malformed_request");
}

#[tokio::test]
async fn parallel_execution_preserves_call_order() {
    let registry = registry().await;
    let calls = vec![
        call("detect_reflection_keywords", json!({"prompt": "rippled water at golden hour"})),
        call("map_material_properties", json!({"material_id": "gold"})),
        call("get_server_info", json!({})),
        call("get_reflection_taxonomy", json!({"category": "geometry"})),
    ];

    let results = registry.execute_parallel(&calls).await;
    assert_eq!(results.len(), 4);

    let detect = results[0].as_ref().unwrap();
    assert_eq!(detect.data["has_reflection_content"], true);
    assert!(detect.data["detected"]["environments"]
        .as_array()
        .unwrap()
        .contains(&json!("golden_hour")));

    assert!(results[1].as_ref().unwrap().success);
    assert_eq!(results[2].as_ref().unwrap().data["taxonomy_coverage"]["geometry_factors"], 5);
    assert!(results[3].as_ref().unwrap().success);

    assert_eq!(registry.cached_entries().await, 4);
}

#[tokio::test]
async fn enhancement_reports_target_against_achieved() {
    let registry = registry().await;
    let output = registry
        .dispatch(&call(
            "generate_reflection_prompt_enhancement",
            json!({
                "base_prompt": "a quiet lake",
                "material_id": "still_water",
                "target_prominence": "dominant"
            }),
        ))
        .await;

    assert!(output.success, "{:?}", output.error);
    assert_eq!(output.data["requested_prominence"], "dominant");
    let achieved = output.data["achieved_prominence"].as_str().unwrap();
    assert_eq!(output.data["target_met"], json!(achieved == "dominant"));
}

#[tokio::test]
async fn cache_stays_within_capacity() {
    let registry = ToolRegistry::new().with_cache_capacity(8);
    registry
        .register_reflection_tools(Arc::new(Taxonomy::builtin().unwrap()))
        .await;

    for i in 0..100 {
        let output = registry
            .dispatch(&call("detect_reflection_keywords", json!({"prompt": format!("chrome kettle {}", i)})))
            .await;
        assert!(output.success);
    }

    assert_eq!(registry.cache_capacity().await, 8);
    assert_eq!(registry.cached_entries().await, 8);
}

#[tokio::test]
async fn phenomenon_measurements_are_exported() {
    let registry = registry().await;
    let output = registry
        .dispatch(&call("get_reflection_taxonomy", json!({"category": "phenomenon"})))
        .await;
    assert!(output.success, "{:?}", output.error);

    let phenomena = output.data.to_string();
    assert!(phenomena.contains("critical_angle_glass"));
    assert!(phenomena.contains("elongated"));
}
