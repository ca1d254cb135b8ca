//! Counterfactual search.
//!
//! Answers "which other crop would require the smallest relative change to
//! the inputs the user can act on". For every class except the top-ranked
//! one, sums the percent deviation between the supplied value and the
//! class's reference mean over modifiable features, then keeps the cheapest
//! candidate. Features that are absent from the input, or whose reference
//! mean is exactly zero, are excluded from the sum; a candidate with no
//! usable feature at all has no computable deviation and is skipped rather
//! than winning with a trivial zero.
//!
//! Candidates are visited in the profile's lexical label order, and the
//! first encountered minimum is retained, so ties are reproducible.

use serde::{Deserialize, Serialize};

use crate::dataset::ReferenceProfile;
use crate::engine::normalize::NormalizedInput;
use crate::engine::round_to;
use cr_common::FeatureCatalog;

/// One per-feature change required to reach the alternative's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedChange {
    /// Display name of the feature.
    pub feature: String,
    /// Supplied value, rounded to 2 decimals.
    pub current: f64,
    /// Reference mean for the alternative class, rounded to 2 decimals.
    pub ideal: f64,
    /// `ideal - current`, rounded to 2 decimals.
    pub change: f64,
}

/// Result of the counterfactual search.
///
/// All fields are null/empty when no candidate class yields a computable
/// deviation (single-class profile, or every modifiable feature absent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterfactualSuggestion {
    /// The cheapest alternative class, if any.
    pub alternative_crop: Option<String>,
    /// Total percent deviation for that class, rounded to 2 decimals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_deviation: Option<f64>,
    /// Per-feature deltas, restricted to the features used in the sum.
    pub suggested_changes: Vec<SuggestedChange>,
}

impl CounterfactualSuggestion {
    /// The empty result: representable, not an error.
    pub fn none() -> Self {
        CounterfactualSuggestion {
            alternative_crop: None,
            percent_deviation: None,
            suggested_changes: Vec::new(),
        }
    }
}

/// Search all non-top classes for the cheapest alternative.
pub fn search(
    catalog: &FeatureCatalog,
    input: &NormalizedInput,
    profile: &ReferenceProfile,
    top_label: &str,
) -> CounterfactualSuggestion {
    let mut best: Option<(f64, &str, Vec<SuggestedChange>)> = None;

    for (label, means) in profile {
        if label == top_label {
            continue;
        }

        let mut total_deviation = 0.0;
        let mut changes = Vec::new();

        for (i, def) in catalog.iter().enumerate() {
            if !def.modifiable {
                continue;
            }
            let Some(current) = input.value(i).value() else {
                continue;
            };
            let ideal = means[i];
            if ideal == 0.0 {
                continue;
            }

            total_deviation += ((current - ideal) / ideal).abs() * 100.0;
            changes.push(SuggestedChange {
                feature: def.display.to_string(),
                current: round_to(current, 2),
                ideal: round_to(ideal, 2),
                change: round_to(ideal - current, 2),
            });
        }

        if changes.is_empty() {
            continue;
        }
        let is_better = match &best {
            Some((best_dev, _, _)) => total_deviation < *best_dev,
            None => true,
        };
        if is_better {
            best = Some((total_deviation, label, changes));
        }
    }

    match best {
        Some((deviation, label, changes)) => CounterfactualSuggestion {
            alternative_crop: Some(label.to_string()),
            percent_deviation: Some(round_to(deviation, 2)),
            suggested_changes: changes,
        },
        None => CounterfactualSuggestion::none(),
    }
}
