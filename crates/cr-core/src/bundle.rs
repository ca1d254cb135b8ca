//! Model bundle loading and validation.
//!
//! The bundle is the JSON artifact exported by offline training. It carries
//! the ordered feature schema, the class label table, and per-class training
//! statistics used by the built-in profile collaborators. Everything the
//! engine needs from the model side is validated here once at load time;
//! requests never re-read the artifact.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use cr_common::{Error, FeatureCatalog, Result};

/// Bundle schema version this build understands.
pub const BUNDLE_SCHEMA_VERSION: &str = "1.0.0";

/// Per-class training statistics, aligned to the bundle's feature order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassStats {
    /// Per-feature mean over the class's training rows.
    pub mean: Vec<f64>,
    /// Per-feature standard deviation over the class's training rows.
    pub std: Vec<f64>,
}

/// A loadable model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    /// Artifact schema version.
    pub schema_version: String,

    /// Ordered feature schema. Fixed for the lifetime of the bundle; every
    /// probability and attribution vector is aligned to this order.
    pub features: Vec<String>,

    /// Class labels in classifier index order.
    pub classes: Vec<String>,

    /// Training statistics per class label.
    pub class_stats: BTreeMap<String, ClassStats>,
}

impl ModelBundle {
    /// Load and validate a bundle from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parse and validate a bundle from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self> {
        let bundle: ModelBundle = serde_json::from_str(raw)?;
        bundle.validate()?;
        Ok(bundle)
    }

    /// Validate internal consistency. Fails fast so a broken artifact is
    /// caught at startup rather than mid-request.
    pub fn validate(&self) -> Result<()> {
        if self.schema_version != BUNDLE_SCHEMA_VERSION {
            return Err(Error::BundleInvalid(format!(
                "unsupported schema version '{}' (expected '{}')",
                self.schema_version, BUNDLE_SCHEMA_VERSION
            )));
        }
        if self.classes.is_empty() {
            return Err(Error::BundleInvalid("bundle declares no classes".into()));
        }
        let mut seen = std::collections::BTreeSet::new();
        for label in &self.classes {
            if !seen.insert(label) {
                return Err(Error::BundleInvalid(format!(
                    "duplicate class label '{label}'"
                )));
            }
        }
        for label in &self.classes {
            let stats = self.class_stats.get(label).ok_or_else(|| {
                Error::BundleInvalid(format!("missing class_stats for '{label}'"))
            })?;
            if stats.mean.len() != self.features.len() || stats.std.len() != self.features.len() {
                return Err(Error::BundleInvalid(format!(
                    "class_stats for '{}' has {} means / {} stds, expected {}",
                    label,
                    stats.mean.len(),
                    stats.std.len(),
                    self.features.len()
                )));
            }
            if stats.std.iter().any(|s| !s.is_finite() || *s < 0.0) {
                return Err(Error::BundleInvalid(format!(
                    "class_stats for '{label}' contains a negative or non-finite std"
                )));
            }
        }
        Ok(())
    }

    /// Build the feature catalog for this bundle's schema.
    pub fn catalog(&self) -> Result<FeatureCatalog> {
        FeatureCatalog::from_schema(&self.features)
    }

    /// Number of classes the classifier can emit.
    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// Decode a class index to its label.
    pub fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    /// Encode a class label to its index.
    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == label)
    }
}
