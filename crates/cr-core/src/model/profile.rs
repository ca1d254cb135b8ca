//! Built-in profile-based collaborators.
//!
//! These are the deterministic reference implementations the CLI wires in
//! when no external model runtime is attached. The classifier scores each
//! class by standardized distance from the class's training means and
//! softmaxes the negated scores; the explainer reports, per feature, how
//! much closer (or farther) the row sits to a class than to the average
//! class. Absent features simply contribute nothing, so partial rows degrade
//! smoothly instead of poisoning the scores.

use crate::bundle::{ClassStats, ModelBundle};
use crate::engine::normalize::NormalizedInput;

use super::{AttributionSet, Classifier, Explainer};
use cr_common::Result;

/// Guards against zero training variance.
const MIN_STD: f64 = 1e-9;

/// Softmax-over-profile-distance classifier.
#[derive(Debug, Clone)]
pub struct ProfileClassifier {
    stats: Vec<ClassStats>,
}

impl ProfileClassifier {
    /// Build from a validated bundle, cloning stats into class-index order.
    pub fn from_bundle(bundle: &ModelBundle) -> Self {
        let stats = bundle
            .classes
            .iter()
            .map(|label| bundle.class_stats[label].clone())
            .collect();
        ProfileClassifier { stats }
    }

    /// Mean squared z-distance from the row to one class profile, over
    /// present features. An all-absent row scores 0 for every class, which
    /// softmaxes to a uniform distribution.
    fn penalty(&self, class: usize, row: &NormalizedInput) -> f64 {
        let stats = &self.stats[class];
        let mut total = 0.0;
        let mut n = 0usize;
        for (i, value) in row.values().iter().enumerate() {
            if let Some(x) = value.value() {
                let z = (x - stats.mean[i]) / stats.std[i].max(MIN_STD);
                total += z * z;
                n += 1;
            }
        }
        if n == 0 {
            0.0
        } else {
            total / n as f64
        }
    }
}

impl Classifier for ProfileClassifier {
    fn predict_proba(&self, row: &NormalizedInput) -> Result<Vec<f64>> {
        let scores: Vec<f64> = (0..self.stats.len())
            .map(|c| -self.penalty(c, row))
            .collect();

        // Max-subtracted softmax for numerical stability.
        let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let total: f64 = exps.iter().sum();
        Ok(exps.iter().map(|e| e / total).collect())
    }
}

/// Contrastive per-feature explainer for [`ProfileClassifier`].
#[derive(Debug, Clone)]
pub struct ProfileExplainer {
    stats: Vec<ClassStats>,
}

impl ProfileExplainer {
    pub fn from_bundle(bundle: &ModelBundle) -> Self {
        let stats = bundle
            .classes
            .iter()
            .map(|label| bundle.class_stats[label].clone())
            .collect();
        ProfileExplainer { stats }
    }

    /// Per-feature score contribution for one class: the negated squared
    /// z-distance, averaged over present features to match the classifier.
    fn contributions(&self, class: usize, row: &NormalizedInput) -> Vec<f64> {
        let stats = &self.stats[class];
        let present = row.values().iter().filter(|v| v.is_present()).count();
        row.values()
            .iter()
            .enumerate()
            .map(|(i, value)| match value.value() {
                Some(x) if present > 0 => {
                    let z = (x - stats.mean[i]) / stats.std[i].max(MIN_STD);
                    -(z * z) / present as f64
                }
                _ => 0.0,
            })
            .collect()
    }
}

impl Explainer for ProfileExplainer {
    fn explain(&self, row: &NormalizedInput) -> Result<AttributionSet> {
        let num_classes = self.stats.len();
        let num_features = row.values().len();

        let per_class: Vec<Vec<f64>> = (0..num_classes)
            .map(|c| self.contributions(c, row))
            .collect();

        // Contrast each class against the average class, so a positive
        // attribution means the feature favors this class over the field.
        let mut mean_contrib = vec![0.0; num_features];
        for contribs in &per_class {
            for (i, c) in contribs.iter().enumerate() {
                mean_contrib[i] += c / num_classes as f64;
            }
        }

        let values: Vec<Vec<f64>> = per_class
            .iter()
            .map(|contribs| {
                contribs
                    .iter()
                    .enumerate()
                    .map(|(i, c)| c - mean_contrib[i])
                    .collect()
            })
            .collect();

        let baselines = vec![1.0 / num_classes as f64; num_classes];
        Ok(AttributionSet { values, baselines })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::normalize::normalize;
    use crate::test_utils;

    #[test]
    fn test_probabilities_sum_to_one() {
        let bundle = test_utils::bundle();
        let catalog = bundle.catalog().unwrap();
        let classifier = ProfileClassifier::from_bundle(&bundle);
        let row = normalize(&catalog, &test_utils::full_input_row()).unwrap();

        let probs = classifier.predict_proba(&row).unwrap();
        assert_eq!(probs.len(), bundle.num_classes());
        let total: f64 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(probs.iter().all(|p| *p > 0.0));
    }

    #[test]
    fn test_nearest_profile_wins() {
        let bundle = test_utils::bundle();
        let catalog = bundle.catalog().unwrap();
        let classifier = ProfileClassifier::from_bundle(&bundle);

        // The fixture row sits close to the rice profile.
        let row = normalize(&catalog, &test_utils::full_input_row()).unwrap();
        let probs = classifier.predict_proba(&row).unwrap();
        let rice = bundle.encode("rice").unwrap();
        let best = probs
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap()
            .0;
        assert_eq!(best, rice);
    }

    #[test]
    fn test_empty_row_is_uniform() {
        let bundle = test_utils::bundle();
        let catalog = bundle.catalog().unwrap();
        let classifier = ProfileClassifier::from_bundle(&bundle);
        let row = normalize(&catalog, &Default::default()).unwrap();

        let probs = classifier.predict_proba(&row).unwrap();
        let expected = 1.0 / bundle.num_classes() as f64;
        assert!(probs.iter().all(|p| (p - expected).abs() < 1e-9));
    }

    #[test]
    fn test_explainer_shape_and_alignment() {
        let bundle = test_utils::bundle();
        let catalog = bundle.catalog().unwrap();
        let explainer = ProfileExplainer::from_bundle(&bundle);
        let row = normalize(&catalog, &test_utils::full_input_row()).unwrap();

        let set = explainer.explain(&row).unwrap();
        set.validate(catalog.len(), bundle.num_classes()).unwrap();
    }

    #[test]
    fn test_absent_feature_gets_zero_attribution() {
        let bundle = test_utils::bundle();
        let catalog = bundle.catalog().unwrap();
        let explainer = ProfileExplainer::from_bundle(&bundle);

        let mut input = test_utils::full_input_row();
        input.remove("rainfall");
        let row = normalize(&catalog, &input).unwrap();
        let rainfall = catalog.index_of("rainfall").unwrap();

        let set = explainer.explain(&row).unwrap();
        for class_values in &set.values {
            assert_eq!(class_values[rainfall], 0.0);
        }
    }

    #[test]
    fn test_attributions_are_contrastive() {
        // Summed over classes, each feature's attribution cancels out.
        let bundle = test_utils::bundle();
        let catalog = bundle.catalog().unwrap();
        let explainer = ProfileExplainer::from_bundle(&bundle);
        let row = normalize(&catalog, &test_utils::full_input_row()).unwrap();

        let set = explainer.explain(&row).unwrap();
        for feature in 0..catalog.len() {
            let total: f64 = set.values.iter().map(|v| v[feature]).sum();
            assert!(total.abs() < 1e-9);
        }
    }
}
