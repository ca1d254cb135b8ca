//! Property-based tests for ranking and trust invariants.

use proptest::prelude::*;
use std::collections::BTreeMap;

use cr_core::bundle::{ClassStats, ModelBundle};
use cr_core::engine::ranking::{assess_trust, rank_top_k, TrustLevel};

/// Bundle with `n` synthetic classes over the standard seven-feature schema.
fn bundle_with_classes(n: usize) -> ModelBundle {
    let features: Vec<String> = ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let classes: Vec<String> = (0..n).map(|i| format!("crop{i:02}")).collect();
    let class_stats: BTreeMap<String, ClassStats> = classes
        .iter()
        .map(|label| {
            (
                label.clone(),
                ClassStats {
                    mean: vec![1.0; features.len()],
                    std: vec![1.0; features.len()],
                },
            )
        })
        .collect();
    let bundle = ModelBundle {
        schema_version: "1.0.0".to_string(),
        features,
        classes,
        class_stats,
    };
    bundle.validate().unwrap();
    bundle
}

/// Raw positive weights normalized into a probability vector.
fn probs_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1e-6f64..=1.0, 2..=12).prop_map(|weights| {
        let total: f64 = weights.iter().sum();
        weights.into_iter().map(|w| w / total).collect()
    })
}

proptest! {
    #[test]
    fn ranking_is_descending_and_bounded(probs in probs_strategy(), k in 1usize..=6) {
        let bundle = bundle_with_classes(probs.len());
        let ranked = rank_top_k(&bundle, &probs, k).unwrap();

        prop_assert_eq!(ranked.len(), k.min(probs.len()));
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].probability >= pair[1].probability);
        }
        for entry in &ranked {
            prop_assert_eq!(&entry.label, &bundle.classes[entry.index]);
            prop_assert_eq!(entry.probability, probs[entry.index]);
        }
    }

    #[test]
    fn ranking_is_a_permutation_prefix(probs in probs_strategy()) {
        let bundle = bundle_with_classes(probs.len());
        let ranked = rank_top_k(&bundle, &probs, probs.len()).unwrap();

        let mut indices: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        indices.sort_unstable();
        prop_assert_eq!(indices, (0..probs.len()).collect::<Vec<_>>());
    }

    #[test]
    fn trust_margin_is_within_unit_interval(probs in probs_strategy()) {
        let bundle = bundle_with_classes(probs.len());
        let ranked = rank_top_k(&bundle, &probs, 3).unwrap();
        let trust = assess_trust(&ranked);

        let margin = trust.confidence.unwrap();
        prop_assert!((0.0..=1.0).contains(&margin), "margin={margin}");
    }

    #[test]
    fn trust_level_matches_margin_thresholds(probs in probs_strategy()) {
        let bundle = bundle_with_classes(probs.len());
        let ranked = rank_top_k(&bundle, &probs, 3).unwrap();
        let trust = assess_trust(&ranked);

        let margin = trust.confidence.unwrap();
        let expected = if margin >= 0.5 {
            TrustLevel::High
        } else if margin >= 0.25 {
            TrustLevel::Medium
        } else {
            TrustLevel::Low
        };
        prop_assert_eq!(trust.level, expected);
    }

    #[test]
    fn ranking_ignores_input_order_of_equal_runs(probs in probs_strategy()) {
        // Ranking twice over the same vector is identical, including ties.
        let bundle = bundle_with_classes(probs.len());
        let a = rank_top_k(&bundle, &probs, probs.len()).unwrap();
        let b = rank_top_k(&bundle, &probs, probs.len()).unwrap();
        prop_assert_eq!(a, b);
    }
}
