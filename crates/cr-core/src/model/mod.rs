//! Collaborator seams for the trained model.
//!
//! The engine treats classification and attribution as external, synchronous
//! black boxes behind these traits. Both receive the fully schema-aligned
//! row and must produce vectors in the bundle's class and feature order.
//! The built-in deterministic implementations live in [`profile`]; tests use
//! hand-built mocks.

pub mod profile;

use cr_common::{Error, Result};

use crate::engine::normalize::NormalizedInput;

pub use profile::{ProfileClassifier, ProfileExplainer};

/// Per-class attribution vectors for one input row.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributionSet {
    /// `values[class][feature]`: signed contribution of each feature to each
    /// class's predicted probability, relative to that class's baseline.
    pub values: Vec<Vec<f64>>,
    /// `baselines[class]`: expected model output absent feature information.
    pub baselines: Vec<f64>,
}

impl AttributionSet {
    /// Validate shape against the schema and class count.
    pub fn validate(&self, num_features: usize, num_classes: usize) -> Result<()> {
        if self.values.len() != num_classes || self.baselines.len() != num_classes {
            return Err(Error::AttributionShape {
                got: self.values.len(),
                expected: num_classes,
            });
        }
        for class_values in &self.values {
            if class_values.len() != num_features {
                return Err(Error::AttributionShape {
                    got: class_values.len(),
                    expected: num_features,
                });
            }
        }
        Ok(())
    }

    /// Attribution vector and baseline for one class index.
    pub fn for_class(&self, index: usize) -> (&[f64], f64) {
        (&self.values[index], self.baselines[index])
    }
}

/// A trained multi-class classifier.
pub trait Classifier {
    /// Class probabilities in bundle class order.
    ///
    /// Deterministic for a fixed input; probabilities sum to 1 by model
    /// contract (not enforced here).
    fn predict_proba(&self, row: &NormalizedInput) -> Result<Vec<f64>>;
}

/// An attribution explainer for the classifier.
pub trait Explainer {
    /// Per-feature, per-class contribution scores plus baselines, aligned to
    /// the same feature ordering the classifier sees.
    fn explain(&self, row: &NormalizedInput) -> Result<AttributionSet>;
}
