//! Service Configuration
//!
//! Settings read from the environment (and `.env`, via dotenv) at startup.

use std::path::PathBuf;
use tracing::warn;

use crate::tools::DEFAULT_CACHE_CAPACITY;

pub const TAXONOMY_PATH_VAR: &str = "REFLECT_TAXONOMY_PATH";
pub const LOG_FILTER_VAR: &str = "REFLECT_LOG";
pub const CACHE_VAR: &str = "REFLECT_CACHE";
pub const CACHE_CAPACITY_VAR: &str = "REFLECT_CACHE_CAPACITY";

pub const DEFAULT_LOG_FILTER: &str = "reflective_surfaces=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Substitute taxonomy file; the built-in tables are used when unset
    pub taxonomy_path: Option<PathBuf>,
    /// Fallback `tracing` filter when `RUST_LOG` is unset
    pub log_filter: String,
    /// Memoize successful tool outputs
    pub cache_results: bool,
    /// Most memoized outputs kept before the oldest is evicted
    pub cache_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            taxonomy_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            cache_results: true,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

fn parse_capacity(value: &str, fallback: usize) -> usize {
    value.trim().parse().unwrap_or_else(|_| {
        warn!("Ignoring {}={:?}; using {}", CACHE_CAPACITY_VAR, value, fallback);
        fallback
    })
}

fn parse_flag(value: &str) -> bool {
    !matches!(value.trim().to_lowercase().as_str(), "0" | "false" | "off" | "no")
}

impl ServiceConfig {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            taxonomy_path: lookup(TAXONOMY_PATH_VAR)
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            log_filter: lookup(LOG_FILTER_VAR)
                .filter(|f| !f.trim().is_empty())
                .unwrap_or(defaults.log_filter),
            cache_results: lookup(CACHE_VAR)
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.cache_results),
            cache_capacity: lookup(CACHE_CAPACITY_VAR)
                .map(|v| parse_capacity(&v, defaults.cache_capacity))
                .unwrap_or(defaults.cache_capacity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_lookup(|_| None);
        assert_eq!(config, ServiceConfig::default());
        assert!(config.cache_results);
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            (TAXONOMY_PATH_VAR, "/etc/reflect/taxonomy.yaml"),
            (LOG_FILTER_VAR, "reflective_surfaces=debug"),
            (CACHE_VAR, "off"),
            (CACHE_CAPACITY_VAR, "32"),
        ]));
        assert_eq!(config.taxonomy_path, Some(PathBuf::from("/etc/reflect/taxonomy.yaml")));
        assert_eq!(config.log_filter, "reflective_surfaces=debug");
        assert!(!config.cache_results);
        assert_eq!(config.cache_capacity, 32);
    }

    #[test]
    fn test_unparseable_capacity_falls_back() {
        let config = ServiceConfig::from_lookup(lookup_from(&[(CACHE_CAPACITY_VAR, "lots")]));
        assert_eq!(config.cache_capacity, DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = ServiceConfig::from_lookup(lookup_from(&[(TAXONOMY_PATH_VAR, " "), (LOG_FILTER_VAR, "")]));
        assert_eq!(config.taxonomy_path, None);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }
}
