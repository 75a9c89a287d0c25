//! Scenario Comparison
//!
//! Runs several labeled analyses side by side and ranks them by visibility.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, warn};

use crate::analysis::{default_viewing_angle, Analyzer, ReflectionContextRequest, ReflectionContextResult};
use crate::error::{ReflectionError, ReflectionResult};
use crate::optics::Prominence;

/// Visibility delta above which scenarios read as strongly contrasting
pub const VISIBILITY_CONTRAST_THRESHOLD: f64 = 0.4;
/// Distortion delta above which geometry dominates the comparison
pub const DISTORTION_CONTRAST_THRESHOLD: f64 = 0.3;

/// Wire shape of one entry in a scenarios payload
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct ScenarioSpec {
    /// Caller-chosen name reported back with the result
    pub label: String,
    #[serde(alias = "material_id")]
    pub material: String,
    pub geometry: String,
    pub environment: String,
    #[serde(default = "default_viewing_angle")]
    pub viewing_angle: f64,
}

/// A scenario with a caller-chosen label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledRequest {
    pub label: String,
    #[serde(flatten)]
    pub request: ReflectionContextRequest,
}

impl From<ScenarioSpec> for LabeledRequest {
    fn from(spec: ScenarioSpec) -> Self {
        Self {
            label: spec.label,
            request: ReflectionContextRequest::new(spec.material, spec.geometry, spec.environment, spec.viewing_angle),
        }
    }
}

impl LabeledRequest {
    pub fn new(label: impl Into<String>, request: ReflectionContextRequest) -> Self {
        Self { label: label.into(), request }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledResult {
    pub label: String,
    pub analysis: ReflectionContextResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedScenario {
    /// 1-based, highest visibility first
    pub rank: usize,
    pub label: String,
    pub effective_visibility: f64,
    pub distortion_index: f64,
    pub prominence: Prominence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityRelation {
    MoreProminent,
    EquallyProminent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistortionRelation {
    MoreDistorted,
    EquallyDistorted,
    LessDistorted,
}

impl VisibilityRelation {
    fn phrase(&self) -> &'static str {
        match self {
            VisibilityRelation::MoreProminent => "more prominent",
            VisibilityRelation::EquallyProminent => "equally prominent",
        }
    }
}

impl DistortionRelation {
    fn phrase(&self) -> &'static str {
        match self {
            DistortionRelation::MoreDistorted => "more distorted",
            DistortionRelation::EquallyDistorted => "equally distorted",
            DistortionRelation::LessDistorted => "less distorted",
        }
    }
}

/// Qualitative difference between two adjacent ranks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankDelta {
    pub higher: String,
    pub lower: String,
    pub visibility: VisibilityRelation,
    pub distortion: DistortionRelation,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
    pub delta: f64,
}

impl Span {
    fn of(values: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = values
            .into_iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if min > max {
            return Self { min: 0.0, max: 0.0, delta: 0.0 };
        }
        Self { min, max, delta: max - min }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeOff {
    /// Visibility varies enough to create strong compositional contrast
    VisibilityContrast,
    /// Geometric distortion is the main differentiator
    DistortionContrast,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparativeInsights {
    pub visibility_span: Span,
    pub distortion_span: Span,
    pub contrast_ratios: Vec<f64>,
    pub trade_offs: Vec<TradeOff>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioComparison {
    /// Input order
    pub results: Vec<LabeledResult>,
    pub ranking: Vec<RankedScenario>,
    pub deltas: Vec<RankDelta>,
    pub insights: ComparativeInsights,
}

/// Parse a JSON array of labeled scenarios, validating it eagerly
pub fn parse_scenarios(payload: &str) -> ReflectionResult<Vec<LabeledRequest>> {
    let specs: Vec<ScenarioSpec> = serde_json::from_str(payload).map_err(|e| {
        warn!("Rejected scenario payload: {}", e);
        ReflectionError::MalformedRequest(format!("scenarios must be a JSON array of scenario objects: {}", e))
    })?;
    from_specs(specs)
}

/// Convert already-deserialized scenario entries, validating them eagerly
pub fn from_specs(specs: Vec<ScenarioSpec>) -> ReflectionResult<Vec<LabeledRequest>> {
    let requests: Vec<LabeledRequest> = specs.into_iter().map(LabeledRequest::from).collect();
    validate_scenarios(&requests)?;
    Ok(requests)
}

fn validate_scenarios(requests: &[LabeledRequest]) -> ReflectionResult<()> {
    if requests.is_empty() {
        return Err(ReflectionError::invalid("scenarios", "at least one scenario is required"));
    }
    for (i, r) in requests.iter().enumerate() {
        if r.label.trim().is_empty() {
            return Err(ReflectionError::invalid(format!("scenarios[{}].label", i), "label is empty"));
        }
    }
    Ok(())
}

fn relate(higher: &ReflectionContextResult, lower: &ReflectionContextResult) -> (VisibilityRelation, DistortionRelation) {
    let visibility = if higher.effective_visibility > lower.effective_visibility {
        VisibilityRelation::MoreProminent
    } else {
        VisibilityRelation::EquallyProminent
    };
    let distortion = match higher.distortion_index.partial_cmp(&lower.distortion_index) {
        Some(Ordering::Greater) => DistortionRelation::MoreDistorted,
        Some(Ordering::Less) => DistortionRelation::LessDistorted,
        _ => DistortionRelation::EquallyDistorted,
    };
    (visibility, distortion)
}

/// Side-by-side analysis of labeled scenarios
pub struct Comparator {
    analyzer: Analyzer,
}

impl Comparator {
    pub fn new(analyzer: Analyzer) -> Self {
        Self { analyzer }
    }

    pub fn compare(&self, requests: &[LabeledRequest]) -> ReflectionResult<ScenarioComparison> {
        validate_scenarios(requests)?;

        let results = requests
            .iter()
            .map(|r| {
                Ok(LabeledResult {
                    label: r.label.clone(),
                    analysis: self.analyzer.analyze(&r.request)?,
                })
            })
            .collect::<ReflectionResult<Vec<_>>>()?;

        // Stable sort keeps input order among equal visibilities.
        let mut order: Vec<usize> = (0..results.len()).collect();
        order.sort_by(|&a, &b| {
            results[b]
                .analysis
                .effective_visibility
                .total_cmp(&results[a].analysis.effective_visibility)
        });

        let ranking = order
            .iter()
            .enumerate()
            .map(|(i, &idx)| {
                let r = &results[idx];
                RankedScenario {
                    rank: i + 1,
                    label: r.label.clone(),
                    effective_visibility: r.analysis.effective_visibility,
                    distortion_index: r.analysis.distortion_index,
                    prominence: r.analysis.prominence,
                }
            })
            .collect();

        let deltas = order
            .windows(2)
            .map(|pair| {
                let (higher, lower) = (&results[pair[0]], &results[pair[1]]);
                let (visibility, distortion) = relate(&higher.analysis, &lower.analysis);
                RankDelta {
                    higher: higher.label.clone(),
                    lower: lower.label.clone(),
                    visibility,
                    distortion,
                    summary: format!(
                        "{} is {} and {} than {}",
                        higher.label,
                        visibility.phrase(),
                        distortion.phrase(),
                        lower.label
                    ),
                }
            })
            .collect();

        let visibility_span = Span::of(results.iter().map(|r| r.analysis.effective_visibility));
        let distortion_span = Span::of(results.iter().map(|r| r.analysis.distortion_index));
        let mut trade_offs = Vec::new();
        if visibility_span.delta > VISIBILITY_CONTRAST_THRESHOLD {
            trade_offs.push(TradeOff::VisibilityContrast);
        }
        if distortion_span.delta > DISTORTION_CONTRAST_THRESHOLD {
            trade_offs.push(TradeOff::DistortionContrast);
        }

        debug!("Compared {} scenarios", results.len());

        Ok(ScenarioComparison {
            insights: ComparativeInsights {
                visibility_span,
                distortion_span,
                contrast_ratios: results.iter().map(|r| r.analysis.lighting.contrast_ratio).collect(),
                trade_offs,
            },
            results,
            ranking,
            deltas,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Taxonomy;
    use std::sync::Arc;

    fn comparator() -> (Comparator, Analyzer) {
        let analyzer = Analyzer::new(Arc::new(Taxonomy::builtin().unwrap()));
        (Comparator::new(analyzer.clone()), analyzer)
    }

    #[test]
    fn test_two_scenarios_in_input_order() {
        let (comparator, analyzer) = comparator();
        let requests = vec![
            LabeledRequest::new("Dawn mirror", ReflectionContextRequest::new("mirror_glass", "flat", "golden_hour", 30.0)),
            LabeledRequest::new("Chrome dome", ReflectionContextRequest::new("polished_chrome", "convex", "bright_daylight", 80.0)),
        ];

        let comparison = comparator.compare(&requests).unwrap();
        assert_eq!(comparison.results.len(), 2);
        assert_eq!(comparison.results[0].label, "Dawn mirror");
        assert_eq!(comparison.results[1].label, "Chrome dome");
        for (req, res) in requests.iter().zip(&comparison.results) {
            assert_eq!(res.analysis, analyzer.analyze(&req.request).unwrap());
        }
    }

    #[test]
    fn test_ranking_and_deltas() {
        let (comparator, _) = comparator();
        let requests = vec![
            LabeledRequest::new("faint", ReflectionContextRequest::new("frosted_glass", "compound", "overcast", 10.0)),
            LabeledRequest::new("bright", ReflectionContextRequest::new("mirror_glass", "flat", "bright_daylight", 89.0)),
        ];

        let comparison = comparator.compare(&requests).unwrap();
        assert_eq!(comparison.ranking[0].label, "bright");
        assert_eq!(comparison.ranking[0].rank, 1);
        assert_eq!(comparison.ranking[1].label, "faint");

        let delta = &comparison.deltas[0];
        assert_eq!(delta.visibility, VisibilityRelation::MoreProminent);
        assert_eq!(delta.distortion, DistortionRelation::LessDistorted);
        assert_eq!(delta.summary, "bright is more prominent and less distorted than faint");
        assert!(comparison.insights.trade_offs.contains(&TradeOff::VisibilityContrast));
        assert!(comparison.insights.trade_offs.contains(&TradeOff::DistortionContrast));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let (comparator, _) = comparator();
        let request = ReflectionContextRequest::new("copper", "faceted", "overcast", 40.0);
        let requests = vec![
            LabeledRequest::new("first", request.clone()),
            LabeledRequest::new("second", request),
        ];
        let comparison = comparator.compare(&requests).unwrap();
        assert_eq!(comparison.ranking[0].label, "first");
        assert_eq!(comparison.deltas[0].visibility, VisibilityRelation::EquallyProminent);
        assert_eq!(comparison.deltas[0].distortion, DistortionRelation::EquallyDistorted);
        assert!(comparison.insights.trade_offs.is_empty());
    }

    #[test]
    fn test_one_failure_fails_all() {
        let (comparator, _) = comparator();
        let requests = vec![
            LabeledRequest::new("ok", ReflectionContextRequest::new("gold", "flat", "overcast", 40.0)),
            LabeledRequest::new("bad", ReflectionContextRequest::new("gold", "toroidal", "overcast", 40.0)),
        ];
        assert_eq!(comparator.compare(&requests).unwrap_err().kind(), "not_found");
    }

    #[test]
    fn test_parse_scenarios() {
        let requests = parse_scenarios(
            r#"[{"label": "Dawn mirror", "material_id": "mirror_glass", "geometry": "flat",
                 "environment": "golden_hour", "viewing_angle": 30.0},
                {"label": "Lake", "material": "still_water", "geometry": "flat", "environment": "overcast"}]"#,
        )
        .unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].request.material, "mirror_glass");
        assert_eq!(requests[1].request.viewing_angle, 45.0);
    }

    #[test]
    fn test_parse_rejects_malformed_payloads() {
        assert_eq!(parse_scenarios("not json").unwrap_err().kind(), "malformed_request");
        assert_eq!(parse_scenarios(r#"{"label": "x"}"#).unwrap_err().kind(), "malformed_request");
        assert_eq!(parse_scenarios(r#"[{"label": "x"}]"#).unwrap_err().kind(), "malformed_request");
    }

    #[test]
    fn test_parse_rejects_empty_and_blank_labels() {
        assert_eq!(
            parse_scenarios("[]").unwrap_err(),
            ReflectionError::invalid("scenarios", "at least one scenario is required")
        );
        let err = parse_scenarios(
            r#"[{"label": " ", "material": "gold", "geometry": "flat", "environment": "overcast"}]"#,
        )
        .unwrap_err();
        match err {
            ReflectionError::InvalidInput { field, .. } => assert_eq!(field, "scenarios[0].label"),
            other => panic!("Unexpected error: {:?}", other),
        }
    }
}
