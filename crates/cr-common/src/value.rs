//! Tagged feature values.
//!
//! Missing measurements are an expected, common case for the target user, so
//! absence is a first-class state rather than a NaN sentinel propagating
//! through arithmetic. Business logic that cares about presence (adjustment
//! suggestions, counterfactual feature selection, caveat text) branches on
//! this type explicitly.

use serde::{Deserialize, Serialize};

/// A single feature measurement: either a supplied number or explicitly absent.
///
/// Serializes as the number itself or JSON `null`, matching the wire shape
/// of the recommendation payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum FeatureValue {
    /// The user supplied this measurement.
    Present(f64),
    /// The measurement was not supplied.
    Absent,
}

impl FeatureValue {
    /// Returns the inner value if present.
    pub fn value(self) -> Option<f64> {
        match self {
            FeatureValue::Present(v) => Some(v),
            FeatureValue::Absent => None,
        }
    }

    /// Returns true if the measurement was supplied.
    pub fn is_present(self) -> bool {
        matches!(self, FeatureValue::Present(_))
    }

    /// Returns true if the measurement was not supplied.
    pub fn is_absent(self) -> bool {
        matches!(self, FeatureValue::Absent)
    }
}

impl From<Option<f64>> for FeatureValue {
    fn from(v: Option<f64>) -> Self {
        match v {
            Some(x) => FeatureValue::Present(x),
            None => FeatureValue::Absent,
        }
    }
}

impl From<FeatureValue> for Option<f64> {
    fn from(v: FeatureValue) -> Self {
        v.value()
    }
}
