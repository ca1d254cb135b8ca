//! Adjustment suggestions.
//!
//! For every modifiable feature the user actually supplied, compares the
//! value against the predicted class's reference mean and emits a
//! directional suggestion toward it. Absent features produce nothing; there
//! is no delta to suggest for a value the user never measured.

use serde::{Deserialize, Serialize};

use crate::engine::normalize::NormalizedInput;
use crate::engine::round_to;
use cr_common::FeatureCatalog;

/// Direction of a suggested change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increasing,
    Decreasing,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Increasing => write!(f, "increasing"),
            Direction::Decreasing => write!(f, "decreasing"),
        }
    }
}

/// One directional suggestion for a modifiable feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    /// Display name of the feature.
    pub feature: String,
    /// Direction toward the reference mean. Equality favors decreasing
    /// (the non-increase branch).
    pub direction: Direction,
    /// Reference mean for the predicted class, rounded to 1 decimal.
    pub target: f64,
    /// The value the user supplied.
    pub current: f64,
}

impl Adjustment {
    /// Suggestion line as it appears in the report text.
    pub fn text(&self) -> String {
        format!(
            "{} {} to {:.1}(Currently : {})",
            self.direction, self.feature, self.target, self.current
        )
    }
}

/// Build suggestions for one predicted class.
///
/// `reference_means` is the class-conditional mean vector in catalog order.
/// Output follows catalog order, so repeated runs produce identical lists.
pub fn suggest_adjustments(
    catalog: &FeatureCatalog,
    input: &NormalizedInput,
    reference_means: &[f64],
) -> Vec<Adjustment> {
    catalog
        .iter()
        .enumerate()
        .filter(|(_, def)| def.modifiable)
        .filter_map(|(i, def)| {
            let current = input.value(i).value()?;
            let ideal = reference_means[i];
            let direction = if ideal > current {
                Direction::Increasing
            } else {
                Direction::Decreasing
            };
            Some(Adjustment {
                feature: def.display.to_string(),
                direction,
                target: round_to(ideal, 1),
                current,
            })
        })
        .collect()
}
