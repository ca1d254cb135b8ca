//! Shared unit-test fixtures.
//!
//! Mirrors the reference scenario used throughout the suite: a seven-feature
//! schema, a four-class bundle whose profiles sit far apart, and the input
//! row {N:90, P:42, K:43, temperature:22.0, humidity:80.0, ph:6.5,
//! rainfall:200.0}, which lands closest to the rice profile.

use std::collections::BTreeMap;

use cr_common::catalog::KNOWN_FEATURES;
use cr_common::{FeatureCatalog, Result};

use crate::bundle::{ClassStats, ModelBundle, BUNDLE_SCHEMA_VERSION};
use crate::dataset::ReferenceProfile;
use crate::engine::normalize::InputRow;
use crate::model::{AttributionSet, Classifier, Explainer};

pub fn catalog() -> FeatureCatalog {
    let keys: Vec<String> = KNOWN_FEATURES.iter().map(|d| d.key.to_string()).collect();
    FeatureCatalog::from_schema(&keys).unwrap()
}

pub fn full_input_row() -> InputRow {
    let mut row = InputRow::new();
    row.insert("N".into(), 90.0);
    row.insert("P".into(), 42.0);
    row.insert("K".into(), 43.0);
    row.insert("temperature".into(), 22.0);
    row.insert("humidity".into(), 80.0);
    row.insert("ph".into(), 6.5);
    row.insert("rainfall".into(), 200.0);
    row
}

fn stats(mean: [f64; 7], std: [f64; 7]) -> ClassStats {
    ClassStats {
        mean: mean.to_vec(),
        std: std.to_vec(),
    }
}

/// Four-class bundle. Class index order is deliberately not lexical
/// (rice first) so index-vs-label confusions show up in tests.
pub fn bundle() -> ModelBundle {
    let features: Vec<String> = KNOWN_FEATURES.iter().map(|d| d.key.to_string()).collect();
    let mut class_stats = BTreeMap::new();
    class_stats.insert(
        "rice".to_string(),
        stats(
            [80.0, 47.0, 40.0, 23.7, 82.0, 6.4, 236.0],
            [11.0, 7.0, 3.0, 1.5, 4.0, 0.4, 30.0],
        ),
    );
    class_stats.insert(
        "maize".to_string(),
        stats(
            [78.0, 48.0, 20.0, 23.4, 65.0, 6.2, 84.0],
            [12.0, 8.0, 4.0, 2.0, 5.0, 0.3, 20.0],
        ),
    );
    class_stats.insert(
        "chickpea".to_string(),
        stats(
            [40.0, 67.0, 79.0, 18.9, 16.9, 7.3, 80.0],
            [9.0, 7.0, 6.0, 1.5, 3.0, 0.3, 15.0],
        ),
    );
    class_stats.insert(
        "kidneybeans".to_string(),
        stats(
            [20.0, 67.0, 20.0, 20.1, 21.6, 5.7, 105.9],
            [8.0, 7.0, 4.0, 1.8, 3.5, 0.3, 18.0],
        ),
    );

    let bundle = ModelBundle {
        schema_version: BUNDLE_SCHEMA_VERSION.to_string(),
        features,
        classes: vec![
            "rice".to_string(),
            "maize".to_string(),
            "chickpea".to_string(),
            "kidneybeans".to_string(),
        ],
        class_stats,
    };
    bundle.validate().unwrap();
    bundle
}

/// Reference profile matching the bundle's training means.
pub fn profile() -> ReferenceProfile {
    let bundle = bundle();
    bundle
        .classes
        .iter()
        .map(|label| (label.clone(), bundle.class_stats[label].mean.clone()))
        .collect()
}

/// Context wired with the built-in profile collaborators.
pub fn context() -> crate::context::EngineContext {
    let bundle = bundle();
    let classifier = Box::new(crate::model::ProfileClassifier::from_bundle(&bundle));
    let explainer = Box::new(crate::model::ProfileExplainer::from_bundle(&bundle));
    crate::context::EngineContext::new(bundle, profile(), classifier, explainer).unwrap()
}

/// Context with caller-supplied collaborators over the fixture bundle.
pub fn context_with(
    classifier: Box<dyn Classifier + Send + Sync>,
    explainer: Box<dyn Explainer + Send + Sync>,
) -> crate::context::EngineContext {
    crate::context::EngineContext::new(bundle(), profile(), classifier, explainer).unwrap()
}

/// Classifier returning a fixed probability vector.
pub struct FixedClassifier(pub Vec<f64>);

impl Classifier for FixedClassifier {
    fn predict_proba(&self, _row: &crate::engine::normalize::NormalizedInput) -> Result<Vec<f64>> {
        Ok(self.0.clone())
    }
}

/// Explainer returning a fixed attribution set.
pub struct FixedExplainer(pub AttributionSet);

impl Explainer for FixedExplainer {
    fn explain(&self, _row: &crate::engine::normalize::NormalizedInput) -> Result<AttributionSet> {
        Ok(self.0.clone())
    }
}

/// An attribution set with the same vector for every class.
pub fn uniform_attributions(num_classes: usize, per_feature: Vec<f64>) -> AttributionSet {
    AttributionSet {
        values: vec![per_feature; num_classes],
        baselines: vec![1.0 / num_classes as f64; num_classes],
    }
}
