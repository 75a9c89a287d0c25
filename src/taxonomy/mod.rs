//! Reflection Taxonomy
//!
//! Read-only lookup tables for materials, reflection types, geometries,
//! environments and optical phenomena. Tables are validated once when a
//! [`Taxonomy`] is constructed and then shared behind an `Arc`.

mod builtin;
mod loader;

pub use loader::TaxonomyLoader;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

use crate::error::{Category, ReflectionError, ReflectionResult};

/// Anything the keyword detector can match against
pub trait Keyed {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn keywords(&self) -> &[String];
}

macro_rules! impl_keyed {
    ($($record:ty),* $(,)?) => {
        $(impl Keyed for $record {
            fn id(&self) -> &str { &self.id }
            fn name(&self) -> &str { &self.name }
            fn keywords(&self) -> &[String] { &self.keywords }
        })*
    };
}

/// Surface material with its optical constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub id: String,
    pub name: String,
    /// Identifier of the governing [`ReflectionTypeRecord`]
    pub reflection_type: String,
    pub reflection_coefficient: f64,
    pub roughness: f64,
    pub metallic: f64,
    /// Index of refraction relative to air
    pub ior: f64,
    #[serde(default)]
    pub color_tint: Option<String>,
    pub keywords: Vec<String>,
}

/// How a reflection type treats the reflected image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpticalBehavior {
    pub preserves_angles: bool,
    pub color_fidelity: String,
    pub depth_perception: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectionTypeRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub reflection_coefficient: f64,
    pub clarity: f64,
    pub distortion: f64,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub example_materials: Vec<String>,
    pub optical_behavior: OpticalBehavior,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryRecord {
    pub id: String,
    pub name: String,
    pub curvature: String,
    /// Fraction of the reflected image lost to distortion; flat is 0
    pub reflection_distortion: f64,
    pub coverage_uniformity: f64,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub example_contexts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentRecord {
    pub id: String,
    pub name: String,
    pub light_intensity: f64,
    pub contrast_ratio: f64,
    /// Kelvin
    pub color_temperature: u32,
    pub reflection_visibility: f64,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhenomenonRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub applicable_materials: Vec<String>,
    /// Phenomenon-specific measurements such as critical angles
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
}

impl_keyed!(
    MaterialRecord,
    ReflectionTypeRecord,
    GeometryRecord,
    EnvironmentRecord,
    PhenomenonRecord,
);

/// Raw, unvalidated table set as it appears on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyTables {
    pub reflection_types: Vec<ReflectionTypeRecord>,
    pub materials: Vec<MaterialRecord>,
    #[serde(default)]
    pub phenomena: Vec<PhenomenonRecord>,
    pub geometries: Vec<GeometryRecord>,
    pub environments: Vec<EnvironmentRecord>,
}

/// A borrowed record from any table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TaxonomyEntry<'a> {
    Material(&'a MaterialRecord),
    ReflectionType(&'a ReflectionTypeRecord),
    Geometry(&'a GeometryRecord),
    Environment(&'a EnvironmentRecord),
    Phenomenon(&'a PhenomenonRecord),
}

impl TaxonomyEntry<'_> {
    pub fn category(&self) -> Category {
        match self {
            TaxonomyEntry::Material(_) => Category::Material,
            TaxonomyEntry::ReflectionType(_) => Category::ReflectionType,
            TaxonomyEntry::Geometry(_) => Category::Geometry,
            TaxonomyEntry::Environment(_) => Category::Environment,
            TaxonomyEntry::Phenomenon(_) => Category::Phenomenon,
        }
    }
}

/// Number of records per table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxonomyCounts {
    pub reflection_types: usize,
    pub surface_materials: usize,
    pub optical_phenomena: usize,
    pub geometry_factors: usize,
    pub environmental_contexts: usize,
}

/// Validated, immutable taxonomy
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Taxonomy {
    tables: TaxonomyTables,
}

fn find<'a, T: Keyed>(records: &'a [T], category: Category, id: &str) -> ReflectionResult<&'a T> {
    records
        .iter()
        .find(|r| r.id() == id)
        .ok_or_else(|| ReflectionError::not_found(category, id))
}

impl Taxonomy {
    /// Validate `tables` and wrap them
    pub fn new(tables: TaxonomyTables) -> ReflectionResult<Self> {
        validate(&tables)?;
        debug!(
            "Taxonomy validated: {} materials, {} reflection types, {} geometries, {} environments, {} phenomena",
            tables.materials.len(),
            tables.reflection_types.len(),
            tables.geometries.len(),
            tables.environments.len(),
            tables.phenomena.len()
        );
        Ok(Self { tables })
    }

    /// The shipped reflective-surface vocabulary
    pub fn builtin() -> ReflectionResult<Self> {
        Self::new(builtin::tables())
    }

    pub fn tables(&self) -> &TaxonomyTables {
        &self.tables
    }

    pub fn materials(&self) -> &[MaterialRecord] {
        &self.tables.materials
    }

    pub fn reflection_types(&self) -> &[ReflectionTypeRecord] {
        &self.tables.reflection_types
    }

    pub fn geometries(&self) -> &[GeometryRecord] {
        &self.tables.geometries
    }

    pub fn environments(&self) -> &[EnvironmentRecord] {
        &self.tables.environments
    }

    pub fn phenomena(&self) -> &[PhenomenonRecord] {
        &self.tables.phenomena
    }

    pub fn material(&self, id: &str) -> ReflectionResult<&MaterialRecord> {
        find(&self.tables.materials, Category::Material, id)
    }

    pub fn reflection_type(&self, id: &str) -> ReflectionResult<&ReflectionTypeRecord> {
        find(&self.tables.reflection_types, Category::ReflectionType, id)
    }

    pub fn geometry(&self, id: &str) -> ReflectionResult<&GeometryRecord> {
        find(&self.tables.geometries, Category::Geometry, id)
    }

    pub fn environment(&self, id: &str) -> ReflectionResult<&EnvironmentRecord> {
        find(&self.tables.environments, Category::Environment, id)
    }

    pub fn phenomenon(&self, id: &str) -> ReflectionResult<&PhenomenonRecord> {
        find(&self.tables.phenomena, Category::Phenomenon, id)
    }

    /// Category-generic lookup
    pub fn lookup(&self, category: Category, id: &str) -> ReflectionResult<TaxonomyEntry<'_>> {
        Ok(match category {
            Category::Material => TaxonomyEntry::Material(self.material(id)?),
            Category::ReflectionType => TaxonomyEntry::ReflectionType(self.reflection_type(id)?),
            Category::Geometry => TaxonomyEntry::Geometry(self.geometry(id)?),
            Category::Environment => TaxonomyEntry::Environment(self.environment(id)?),
            Category::Phenomenon => TaxonomyEntry::Phenomenon(self.phenomenon(id)?),
        })
    }

    /// Identifiers of one table, in table order
    pub fn identifiers(&self, category: Category) -> Vec<&str> {
        fn ids<T: Keyed>(records: &[T]) -> Vec<&str> {
            records.iter().map(|r| r.id()).collect()
        }
        match category {
            Category::Material => ids(&self.tables.materials),
            Category::ReflectionType => ids(&self.tables.reflection_types),
            Category::Geometry => ids(&self.tables.geometries),
            Category::Environment => ids(&self.tables.environments),
            Category::Phenomenon => ids(&self.tables.phenomena),
        }
    }

    pub fn counts(&self) -> TaxonomyCounts {
        TaxonomyCounts {
            reflection_types: self.tables.reflection_types.len(),
            surface_materials: self.tables.materials.len(),
            optical_phenomena: self.tables.phenomena.len(),
            geometry_factors: self.tables.geometries.len(),
            environmental_contexts: self.tables.environments.len(),
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// VALIDATION
// ──────────────────────────────────────────────────────────────────────────────

fn check_unit(table: &str, id: &str, field: &str, value: f64) -> ReflectionResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ReflectionError::invalid(
            format!("{}.{}.{}", table, id, field),
            format!("{} is outside [0, 1]", value),
        ));
    }
    Ok(())
}

fn check_records<T: Keyed>(table: &str, records: &[T]) -> ReflectionResult<()> {
    let mut seen = HashSet::new();
    for record in records {
        let id = record.id();
        if id.trim().is_empty() {
            return Err(ReflectionError::invalid(format!("{}.id", table), "identifier is empty"));
        }
        if !seen.insert(id) {
            return Err(ReflectionError::invalid(
                format!("{}.{}", table, id),
                "duplicate identifier",
            ));
        }
        if record.keywords().iter().any(|k| !k.chars().any(char::is_alphanumeric)) {
            return Err(ReflectionError::invalid(
                format!("{}.{}.keywords", table, id),
                "keyword has no searchable characters",
            ));
        }
    }
    Ok(())
}

fn validate(tables: &TaxonomyTables) -> ReflectionResult<()> {
    check_records("reflection_types", &tables.reflection_types)?;
    check_records("materials", &tables.materials)?;
    check_records("phenomena", &tables.phenomena)?;
    check_records("geometries", &tables.geometries)?;
    check_records("environments", &tables.environments)?;

    for t in &tables.reflection_types {
        check_unit("reflection_types", &t.id, "reflection_coefficient", t.reflection_coefficient)?;
        check_unit("reflection_types", &t.id, "clarity", t.clarity)?;
        check_unit("reflection_types", &t.id, "distortion", t.distortion)?;
    }

    for m in &tables.materials {
        check_unit("materials", &m.id, "reflection_coefficient", m.reflection_coefficient)?;
        check_unit("materials", &m.id, "roughness", m.roughness)?;
        check_unit("materials", &m.id, "metallic", m.metallic)?;
        if !(m.ior.is_finite() && m.ior > 0.0) {
            return Err(ReflectionError::invalid(
                format!("materials.{}.ior", m.id),
                format!("{} is not a positive finite index", m.ior),
            ));
        }
        if !tables.reflection_types.iter().any(|t| t.id == m.reflection_type) {
            return Err(ReflectionError::invalid(
                format!("materials.{}.reflection_type", m.id),
                format!("unknown reflection type '{}'", m.reflection_type),
            ));
        }
    }

    for g in &tables.geometries {
        check_unit("geometries", &g.id, "reflection_distortion", g.reflection_distortion)?;
        check_unit("geometries", &g.id, "coverage_uniformity", g.coverage_uniformity)?;
    }

    for e in &tables.environments {
        check_unit("environments", &e.id, "light_intensity", e.light_intensity)?;
        check_unit("environments", &e.id, "contrast_ratio", e.contrast_ratio)?;
        check_unit("environments", &e.id, "reflection_visibility", e.reflection_visibility)?;
        if e.color_temperature == 0 {
            return Err(ReflectionError::invalid(
                format!("environments.{}.color_temperature", e.id),
                "color temperature must be positive",
            ));
        }
    }

    Ok(())
}
