//! Feature catalog: the static table of known model features.
//!
//! Each feature carries a display name for report text and a `modifiable`
//! flag marking the variables a farmer can plausibly act on (soil nutrients,
//! pH) versus those they cannot (climate). The catalog a request actually
//! uses is built from the model bundle's schema and validated against this
//! table once at load time, so a bundle/catalog drift fails fast instead of
//! producing mislabeled narrative text.

use crate::error::{Error, Result};

/// Definition of a single model feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureDef {
    /// Schema key, as it appears in the model bundle and dataset header.
    pub key: &'static str,
    /// Human-facing display name used in report text.
    pub display: &'static str,
    /// Whether the end user can act on this variable.
    pub modifiable: bool,
}

/// All features this engine knows how to explain.
///
/// Order here is the canonical fallback order; the authoritative per-model
/// order comes from the bundle schema.
pub const KNOWN_FEATURES: &[FeatureDef] = &[
    FeatureDef { key: "N", display: "Nitrogen", modifiable: true },
    FeatureDef { key: "P", display: "Phosphorus", modifiable: true },
    FeatureDef { key: "K", display: "Potassium", modifiable: true },
    FeatureDef { key: "temperature", display: "Temperature", modifiable: false },
    FeatureDef { key: "humidity", display: "Humidity", modifiable: false },
    FeatureDef { key: "ph", display: "pH", modifiable: true },
    FeatureDef { key: "rainfall", display: "Rainfall", modifiable: false },
];

/// Ordered feature catalog for one loaded model bundle.
///
/// Immutable after construction; the ordering matches the bundle schema and
/// therefore the classifier's and explainer's vector layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureCatalog {
    defs: Vec<FeatureDef>,
}

impl FeatureCatalog {
    /// Build a catalog from a bundle's ordered feature schema.
    ///
    /// Fails with [`Error::CatalogMismatch`] if the schema names a feature
    /// this engine does not know, or repeats one.
    pub fn from_schema(keys: &[String]) -> Result<Self> {
        let mut defs = Vec::with_capacity(keys.len());
        for key in keys {
            let def = KNOWN_FEATURES
                .iter()
                .find(|d| d.key == key)
                .copied()
                .ok_or_else(|| {
                    Error::CatalogMismatch(format!("bundle schema names unknown feature '{key}'"))
                })?;
            if defs.contains(&def) {
                return Err(Error::CatalogMismatch(format!(
                    "bundle schema repeats feature '{key}'"
                )));
            }
            defs.push(def);
        }
        if defs.is_empty() {
            return Err(Error::CatalogMismatch("bundle schema is empty".into()));
        }
        Ok(FeatureCatalog { defs })
    }

    /// Number of features in the schema.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// True if the schema is empty (never the case for a valid catalog).
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Definition at a schema index.
    pub fn def(&self, index: usize) -> &FeatureDef {
        &self.defs[index]
    }

    /// Iterate definitions in schema order.
    pub fn iter(&self) -> impl Iterator<Item = &FeatureDef> {
        self.defs.iter()
    }

    /// Schema index for a feature key, if known.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.defs.iter().position(|d| d.key == key)
    }

    /// Display name for a feature key, if known.
    pub fn display_of(&self, key: &str) -> Option<&'static str> {
        self.defs.iter().find(|d| d.key == key).map(|d| d.display)
    }

    /// Schema keys in order.
    pub fn keys(&self) -> Vec<&'static str> {
        self.defs.iter().map(|d| d.key).collect()
    }
}
