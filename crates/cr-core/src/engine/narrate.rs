//! Attribution narration.
//!
//! Converts one class's attribution vector into a causal sentence pair plus
//! the complete per-feature impact payload. The narrative names only the two
//! strongest contributors on each side; the structured list always carries
//! every schema feature so downstream consumers can render their own views.

use serde::{Deserialize, Serialize};

use crate::engine::normalize::NormalizedInput;
use crate::engine::round_to;
use cr_common::{FeatureCatalog, Result};

/// How many contributors each narrative sentence names.
const TOP_CONTRIBUTORS: usize = 2;

/// Structured impact record for one schema feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImpact {
    /// Display name of the feature.
    pub feature: String,
    /// Input value, or null if the feature was absent from the request.
    pub value: Option<f64>,
    /// Attribution value, rounded to 5 decimals.
    pub attribution: f64,
}

/// Narrative output for one predicted class.
#[derive(Debug, Clone, PartialEq)]
pub struct Narrative {
    /// "The best factors supporting this are ..." sentence.
    pub supporting: String,
    /// "However, ... might hinder a good growth." sentence.
    pub hindering: String,
    /// One impact record per schema feature, in schema order.
    pub impacts: Vec<FeatureImpact>,
}

/// Build the narrative for one class's attribution vector.
///
/// Zero attributions are neither supporting nor hindering. An empty
/// supporting set falls back to "unknown factors", an empty hindering set
/// to "none".
pub fn narrate(
    catalog: &FeatureCatalog,
    input: &NormalizedInput,
    attributions: &[f64],
) -> Result<Narrative> {
    if attributions.len() != catalog.len() {
        return Err(cr_common::Error::AttributionShape {
            got: attributions.len(),
            expected: catalog.len(),
        });
    }

    let mut positive: Vec<(usize, f64)> = Vec::new();
    let mut negative: Vec<(usize, f64)> = Vec::new();
    for (i, a) in attributions.iter().enumerate() {
        if *a > 0.0 {
            positive.push((i, *a));
        } else if *a < 0.0 {
            negative.push((i, *a));
        }
    }
    positive.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    negative.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    positive.truncate(TOP_CONTRIBUTORS);
    negative.truncate(TOP_CONTRIBUTORS);

    let good_text = join_displays(catalog, &positive, "unknown factors");
    let bad_text = join_displays(catalog, &negative, "none");

    let impacts = catalog
        .iter()
        .enumerate()
        .map(|(i, def)| FeatureImpact {
            feature: def.display.to_string(),
            value: input.value(i).value(),
            attribution: round_to(attributions[i], 5),
        })
        .collect();

    Ok(Narrative {
        supporting: format!("The best factors supporting this are {good_text}."),
        hindering: format!("However, {bad_text} might hinder a good growth."),
        impacts,
    })
}

fn join_displays(catalog: &FeatureCatalog, entries: &[(usize, f64)], fallback: &str) -> String {
    if entries.is_empty() {
        return fallback.to_string();
    }
    entries
        .iter()
        .map(|(i, _)| catalog.def(*i).display)
        .collect::<Vec<_>>()
        .join(" and ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::normalize::normalize;
    use crate::test_utils;

    fn setup() -> (cr_common::FeatureCatalog, NormalizedInput) {
        let catalog = test_utils::catalog();
        let input = normalize(&catalog, &test_utils::full_input_row()).unwrap();
        (catalog, input)
    }

    #[test]
    fn test_top_two_each_side() {
        let (catalog, input) = setup();
        // N strongly positive, humidity mildly positive, ph weakly positive;
        // K most negative, rainfall second.
        let attributions = vec![0.30, 0.0, -0.25, 0.0, 0.10, 0.05, -0.15];
        let narrative = narrate(&catalog, &input, &attributions).unwrap();

        assert_eq!(
            narrative.supporting,
            "The best factors supporting this are Nitrogen and Humidity."
        );
        assert_eq!(
            narrative.hindering,
            "However, Potassium and Rainfall might hinder a good growth."
        );
    }

    #[test]
    fn test_most_negative_named_first() {
        let (catalog, input) = setup();
        let attributions = vec![0.0, 0.0, -0.05, 0.0, 0.0, -0.40, 0.0];
        let narrative = narrate(&catalog, &input, &attributions).unwrap();
        assert!(narrative.hindering.starts_with("However, pH and Potassium"));
    }

    #[test]
    fn test_fallback_phrases() {
        let (catalog, input) = setup();
        let all_negative = vec![-0.1; 7];
        let narrative = narrate(&catalog, &input, &all_negative).unwrap();
        assert_eq!(
            narrative.supporting,
            "The best factors supporting this are unknown factors."
        );

        let all_positive = vec![0.1; 7];
        let narrative = narrate(&catalog, &input, &all_positive).unwrap();
        assert_eq!(
            narrative.hindering,
            "However, none might hinder a good growth."
        );
    }

    #[test]
    fn test_zero_attribution_is_neither() {
        let (catalog, input) = setup();
        let attributions = vec![0.0; 7];
        let narrative = narrate(&catalog, &input, &attributions).unwrap();
        assert!(narrative.supporting.contains("unknown factors"));
        assert!(narrative.hindering.contains("none"));
    }

    #[test]
    fn test_impacts_cover_every_feature() {
        let (catalog, input) = setup();
        let attributions = vec![0.123_456_789, 0.0, -0.2, 0.0, 0.1, 0.05, -0.15];
        let narrative = narrate(&catalog, &input, &attributions).unwrap();

        assert_eq!(narrative.impacts.len(), catalog.len());
        assert_eq!(narrative.impacts[0].feature, "Nitrogen");
        assert_eq!(narrative.impacts[0].value, Some(90.0));
        assert_eq!(narrative.impacts[0].attribution, 0.12346);
    }

    #[test]
    fn test_absent_feature_has_null_value() {
        let catalog = test_utils::catalog();
        let mut row = test_utils::full_input_row();
        row.remove("humidity");
        let input = normalize(&catalog, &row).unwrap();

        let narrative = narrate(&catalog, &input, &[0.1; 7]).unwrap();
        let humidity = catalog.index_of("humidity").unwrap();
        assert_eq!(narrative.impacts[humidity].value, None);
        assert!(narrative.impacts[humidity].feature == "Humidity");
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let (catalog, input) = setup();
        assert!(narrate(&catalog, &input, &[0.1; 3]).is_err());
    }
}
