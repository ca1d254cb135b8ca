//! Top-K ranking and trust assessment.
//!
//! The trust level is a proxy for prediction certainty derived from the
//! probability gap between the two strongest classes. With only one class
//! there is no second probability to compare against; the documented
//! behavior is to default to High rather than fail.

use serde::{Deserialize, Serialize};

use crate::bundle::ModelBundle;
use crate::engine::round_to;
use cr_common::{Error, Result};

/// Number of ranked classes reported by default.
pub const DEFAULT_TOP_K: usize = 3;

/// Margin at or above which trust is High.
const HIGH_MARGIN: f64 = 0.50;
/// Margin at or above which trust is Medium.
const MEDIUM_MARGIN: f64 = 0.25;

/// One ranked class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedClass {
    /// Classifier index of the class.
    pub index: usize,
    /// Decoded class label.
    pub label: String,
    /// Raw probability (unrounded; reporting rounds at the boundary).
    pub probability: f64,
}

/// Discrete trust level for the prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrustLevel {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrustLevel::High => write!(f, "High"),
            TrustLevel::Medium => write!(f, "Medium"),
            TrustLevel::Low => write!(f, "Low"),
        }
    }
}

/// Confidence margin and its discrete classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustAssessment {
    /// Top-1 minus top-2 probability, rounded to 4 decimals. `None` when the
    /// model has a single class and the margin is undefined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Discrete trust level.
    pub level: TrustLevel,
}

/// Select the top-K classes by descending probability.
///
/// Ties break toward the lower class index (stable sort), so ranking is
/// reproducible regardless of how the probabilities were produced. Fails if
/// the probability vector does not match the bundle's class count.
pub fn rank_top_k(bundle: &ModelBundle, probs: &[f64], k: usize) -> Result<Vec<RankedClass>> {
    if probs.len() != bundle.num_classes() {
        return Err(Error::BundleInvalid(format!(
            "classifier returned {} probabilities for {} classes",
            probs.len(),
            bundle.num_classes()
        )));
    }

    let mut indices: Vec<usize> = (0..probs.len()).collect();
    indices.sort_by(|a, b| {
        probs[*b]
            .partial_cmp(&probs[*a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(indices
        .into_iter()
        .take(k.min(probs.len()))
        .filter_map(|index| {
            bundle.decode(index).map(|label| RankedClass {
                index,
                label: label.to_string(),
                probability: probs[index],
            })
        })
        .collect())
}

/// Classify the confidence margin between the top two ranked classes.
pub fn assess_trust(ranked: &[RankedClass]) -> TrustAssessment {
    match ranked {
        [] | [_] => TrustAssessment {
            confidence: None,
            level: TrustLevel::High,
        },
        [top1, top2, ..] => {
            let margin = round_to(top1.probability - top2.probability, 4);
            let level = if margin >= HIGH_MARGIN {
                TrustLevel::High
            } else if margin >= MEDIUM_MARGIN {
                TrustLevel::Medium
            } else {
                TrustLevel::Low
            };
            TrustAssessment {
                confidence: Some(margin),
                level,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    fn ranked(p1: f64, p2: f64) -> Vec<RankedClass> {
        vec![
            RankedClass { index: 0, label: "rice".into(), probability: p1 },
            RankedClass { index: 1, label: "maize".into(), probability: p2 },
        ]
    }

    #[test]
    fn test_rank_descending() {
        let bundle = test_utils::bundle();
        let ranked = rank_top_k(&bundle, &[0.1, 0.6, 0.25, 0.05], 3).unwrap();

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].label, "maize");
        assert_eq!(ranked[1].label, "chickpea");
        assert_eq!(ranked[2].label, "rice");
        assert!(ranked[0].probability >= ranked[1].probability);
    }

    #[test]
    fn test_k_capped_at_class_count() {
        let bundle = test_utils::bundle();
        let ranked = rank_top_k(&bundle, &[0.4, 0.3, 0.2, 0.1], 10).unwrap();
        assert_eq!(ranked.len(), 4);
    }

    #[test]
    fn test_stable_tie_break_by_index() {
        let bundle = test_utils::bundle();
        let ranked = rank_top_k(&bundle, &[0.25, 0.25, 0.25, 0.25], 3).unwrap();
        assert_eq!(
            ranked.iter().map(|r| r.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let bundle = test_utils::bundle();
        assert!(rank_top_k(&bundle, &[0.5, 0.5], 3).is_err());
    }

    #[test]
    fn test_trust_thresholds_exact() {
        // Boundary values map to the upper tier.
        assert_eq!(assess_trust(&ranked(0.75, 0.25)).level, TrustLevel::High);
        assert_eq!(assess_trust(&ranked(0.62, 0.37)).level, TrustLevel::Medium);
        assert_eq!(assess_trust(&ranked(0.60, 0.36)).level, TrustLevel::Low);
        assert_eq!(assess_trust(&ranked(0.55, 0.30)).level, TrustLevel::Medium);
    }

    #[test]
    fn test_margin_rounded_to_four_decimals() {
        let trust = assess_trust(&ranked(0.612_345_9, 0.112_345_1));
        assert_eq!(trust.confidence, Some(0.5));
        assert_eq!(trust.level, TrustLevel::High);
    }

    #[test]
    fn test_single_class_defaults_high() {
        let only = vec![RankedClass { index: 0, label: "rice".into(), probability: 1.0 }];
        let trust = assess_trust(&only);
        assert_eq!(trust.confidence, None);
        assert_eq!(trust.level, TrustLevel::High);
    }

    #[test]
    fn test_trust_serialization_skips_null_confidence() {
        let trust = TrustAssessment { confidence: None, level: TrustLevel::High };
        let json = serde_json::to_string(&trust).unwrap();
        assert!(!json.contains("confidence"));
    }
}
