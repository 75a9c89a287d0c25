//! Keyword Detection
//!
//! Finds taxonomy entries mentioned in free-form prompt text.
//!
//! Matching policy: text and terms are lowercased and split on every
//! non-alphanumeric character; a term matches when its whole token sequence
//! appears contiguously in the text. `gold` therefore does not match
//! `golden`, while `mirror-like` matches `Mirror like`.

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::Category;
use crate::taxonomy::{Keyed, Taxonomy};

/// Identifiers mentioned in a text, per table, in taxonomy order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub materials: Vec<String>,
    pub reflection_types: Vec<String>,
    pub geometries: Vec<String>,
    pub environments: Vec<String>,
    pub phenomena: Vec<String>,
}

impl Detection {
    pub fn has_reflection_content(&self) -> bool {
        !(self.materials.is_empty()
            && self.reflection_types.is_empty()
            && self.geometries.is_empty()
            && self.environments.is_empty()
            && self.phenomena.is_empty())
    }
}

/// Candidate identifiers for a category the text left unspecified
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub category: Category,
    pub candidates: Vec<String>,
}

/// Trigger words that hint at a material family when no material matched
const MATERIAL_HINTS: &[(&str, &[&str])] = &[
    ("mirror", &["mirror_glass", "polished_chrome"]),
    ("reflection", &["mirror_glass", "polished_chrome"]),
    ("water", &["still_water", "rippled_water"]),
    ("metal", &["polished_chrome", "copper", "gold"]),
];

const ENVIRONMENT_HINTS: &[&str] = &["bright_daylight", "golden_hour", "night_urban"];

/// Lowercased tokens joined by single spaces, padded on both ends
fn normalize(text: &str) -> String {
    let mut out = String::from(" ");
    for token in text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
        out.push_str(&token.to_lowercase());
        out.push(' ');
    }
    out
}

fn mentions(haystack: &str, term: &str) -> bool {
    let needle = normalize(term);
    // A term with no tokens would match everything.
    needle.len() > 1 && haystack.contains(&needle)
}

fn entry_matches<T: Keyed>(haystack: &str, record: &T) -> bool {
    mentions(haystack, &record.id().replace('_', " "))
        || mentions(haystack, record.name())
        || record.keywords().iter().any(|k| mentions(haystack, k))
}

fn scan<T: Keyed>(haystack: &str, records: &[T]) -> Vec<String> {
    records
        .iter()
        .filter(|r| entry_matches(haystack, *r))
        .map(|r| r.id().to_string())
        .collect()
}

/// Scans text against an injected taxonomy
pub struct KeywordDetector {
    taxonomy: Arc<Taxonomy>,
}

impl KeywordDetector {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self { taxonomy }
    }

    /// Report every entry with at least one term present in `text`
    pub fn detect(&self, text: &str) -> Detection {
        let haystack = normalize(text);
        if haystack.len() <= 1 {
            return Detection::default();
        }

        let detection = Detection {
            materials: scan(&haystack, self.taxonomy.materials()),
            reflection_types: scan(&haystack, self.taxonomy.reflection_types()),
            geometries: scan(&haystack, self.taxonomy.geometries()),
            environments: scan(&haystack, self.taxonomy.environments()),
            phenomena: scan(&haystack, self.taxonomy.phenomena()),
        };
        debug!("Keyword detection: {:?}", detection);
        detection
    }

    /// Candidates for the material, geometry and environment slots left empty
    pub fn suggest(&self, text: &str, detection: &Detection) -> Vec<Suggestion> {
        let haystack = normalize(text);
        let known = |category: Category, ids: &[&str]| -> Vec<String> {
            let available = self.taxonomy.identifiers(category);
            ids.iter()
                .filter(|id| available.contains(*id))
                .map(|id| id.to_string())
                .collect()
        };

        let mut suggestions = Vec::new();

        if detection.materials.is_empty() {
            let hinted = MATERIAL_HINTS
                .iter()
                .find(|(trigger, _)| mentions(&haystack, trigger))
                .map(|(_, ids)| known(Category::Material, *ids))
                .unwrap_or_default();
            if !hinted.is_empty() {
                suggestions.push(Suggestion { category: Category::Material, candidates: hinted });
            }
        }

        if detection.geometries.is_empty() {
            let all: Vec<String> = self
                .taxonomy
                .identifiers(Category::Geometry)
                .into_iter()
                .map(str::to_string)
                .collect();
            if !all.is_empty() {
                suggestions.push(Suggestion { category: Category::Geometry, candidates: all });
            }
        }

        if detection.environments.is_empty() {
            let hinted = known(Category::Environment, ENVIRONMENT_HINTS);
            if !hinted.is_empty() {
                suggestions.push(Suggestion { category: Category::Environment, candidates: hinted });
            }
        }

        suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> KeywordDetector {
        KeywordDetector::new(Arc::new(Taxonomy::builtin().unwrap()))
    }

    #[test]
    fn test_empty_and_whitespace_text() {
        let d = detector();
        assert_eq!(d.detect(""), Detection::default());
        assert_eq!(d.detect("   \t\n "), Detection::default());
        assert!(!d.detect("").has_reflection_content());
    }

    #[test]
    fn test_case_insensitive() {
        let d = detector();
        let upper = d.detect("A POLISHED CHROME KETTLE");
        let lower = d.detect("a polished chrome kettle");
        assert_eq!(upper.materials, lower.materials);
        assert_eq!(lower.materials, vec!["polished_chrome"]);
    }

    #[test]
    fn test_token_boundaries() {
        let d = detector();
        let detection = d.detect("portrait at golden hour");
        assert!(detection.materials.is_empty());
        assert_eq!(detection.environments, vec!["golden_hour"]);

        let detection = d.detect("a ring of solid gold");
        assert_eq!(detection.materials, vec!["gold"]);
    }

    #[test]
    fn test_hyphenated_keywords_match_spaced_text() {
        let d = detector();
        let detection = d.detect("Mirror like finish");
        assert_eq!(detection.reflection_types, vec!["specular"]);
    }

    #[test]
    fn test_taxonomy_order_without_duplicates() {
        let d = detector();
        let detection = d.detect("gold ring beside mirror glass, gold again, with copper gleam");
        assert_eq!(detection.materials, vec!["mirror_glass", "copper", "gold"]);
    }

    #[test]
    fn test_all_categories() {
        let d = detector();
        let detection = d.detect(
            "A convex chrome finish sphere at night urban, neon reflections, rainbow edges, specular",
        );
        assert_eq!(detection.materials, vec!["polished_chrome"]);
        assert_eq!(detection.geometries, vec!["convex"]);
        assert_eq!(detection.environments, vec!["night_urban"]);
        assert_eq!(detection.phenomena, vec!["chromatic_aberration"]);
        assert!(detection.reflection_types.contains(&"specular".to_string()));
        assert!(detection.has_reflection_content());
    }

    #[test]
    fn test_suggestions_for_missing_slots() {
        let d = detector();
        let text = "a calm lake with water everywhere";
        let detection = d.detect(text);
        let suggestions = d.suggest(text, &detection);

        assert_eq!(suggestions[0].category, Category::Material);
        assert_eq!(suggestions[0].candidates, vec!["still_water", "rippled_water"]);
        assert_eq!(suggestions[1].category, Category::Geometry);
        assert_eq!(suggestions[1].candidates.len(), 5);
        assert_eq!(suggestions[2].category, Category::Environment);
    }

    #[test]
    fn test_no_suggestions_when_fully_specified() {
        let d = detector();
        let text = "still water, flat, overcast";
        let detection = d.detect(text);
        assert!(d.suggest(text, &detection).is_empty());
    }
}
