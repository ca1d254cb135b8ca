//! Immutable engine context.
//!
//! Everything a request needs is loaded and validated once at startup, then
//! shared read-only: the model bundle, the feature catalog derived from it,
//! the reference profile, and the classifier/explainer collaborators.
//! Requests never re-read artifacts, and no locking is needed because
//! nothing mutates after construction.

use std::path::Path;

use cr_common::{Error, FeatureCatalog, Result};
use tracing::info;

use crate::bundle::ModelBundle;
use crate::dataset::{self, ReferenceProfile};
use crate::model::{Classifier, Explainer, ProfileClassifier, ProfileExplainer};

/// Shared, read-only state for the engine.
pub struct EngineContext {
    bundle: ModelBundle,
    catalog: FeatureCatalog,
    profile: ReferenceProfile,
    classifier: Box<dyn Classifier + Send + Sync>,
    explainer: Box<dyn Explainer + Send + Sync>,
}

impl std::fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineContext")
            .field("bundle", &self.bundle)
            .field("catalog", &self.catalog)
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

impl EngineContext {
    /// Assemble a context from pre-loaded parts, validating cross-artifact
    /// agreement: the catalog must accept the bundle schema, and the profile
    /// must cover every class with vectors of schema length.
    pub fn new(
        bundle: ModelBundle,
        profile: ReferenceProfile,
        classifier: Box<dyn Classifier + Send + Sync>,
        explainer: Box<dyn Explainer + Send + Sync>,
    ) -> Result<Self> {
        bundle.validate()?;
        let catalog = bundle.catalog()?;
        dataset::validate_profile_coverage(&profile, &bundle.classes)?;
        for (label, means) in &profile {
            if means.len() != catalog.len() {
                return Err(Error::DatasetInvalid {
                    line: 0,
                    reason: format!(
                        "profile for '{}' has {} means, expected {}",
                        label,
                        means.len(),
                        catalog.len()
                    ),
                });
            }
        }
        Ok(EngineContext {
            bundle,
            catalog,
            profile,
            classifier,
            explainer,
        })
    }

    /// Load bundle and dataset from disk, wiring the built-in profile
    /// collaborators.
    pub fn load(bundle_path: &Path, dataset_path: &Path) -> Result<Self> {
        let bundle = ModelBundle::load(bundle_path)?;
        let catalog = bundle.catalog()?;
        let profile = dataset::load_profile(dataset_path, &catalog)?;
        info!(
            classes = bundle.num_classes(),
            features = catalog.len(),
            "engine context loaded"
        );
        let classifier = Box::new(ProfileClassifier::from_bundle(&bundle));
        let explainer = Box::new(ProfileExplainer::from_bundle(&bundle));
        Self::new(bundle, profile, classifier, explainer)
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }

    pub fn catalog(&self) -> &FeatureCatalog {
        &self.catalog
    }

    pub fn profile(&self) -> &ReferenceProfile {
        &self.profile
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn explainer(&self) -> &dyn Explainer {
        self.explainer.as_ref()
    }
}
