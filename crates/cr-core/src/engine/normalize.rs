//! Input normalization.
//!
//! Aligns a possibly-partial input row to the feature schema: every schema
//! feature gets a slot, absent measurements get an explicit marker, and the
//! set of absent features is recorded for later caveat reporting. Unknown
//! feature keys are rejected rather than silently dropped, so an upstream
//! schema drift surfaces as an error instead of a quietly wrong narrative.

use std::collections::BTreeMap;

use cr_common::{Error, FeatureCatalog, FeatureValue, Result};

/// Raw input row as supplied by the caller: feature key → measurement.
pub type InputRow = BTreeMap<String, f64>;

/// A schema-aligned input row.
///
/// `values` holds exactly one entry per catalog feature, in catalog order.
/// The model and explainer always receive this fully-aligned row, never the
/// partial original.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedInput {
    values: Vec<FeatureValue>,
    missing: Vec<usize>,
}

impl NormalizedInput {
    /// Values in catalog order.
    pub fn values(&self) -> &[FeatureValue] {
        &self.values
    }

    /// Value at a schema index.
    pub fn value(&self, index: usize) -> FeatureValue {
        self.values[index]
    }

    /// Schema indices of features absent from the original row, ascending.
    pub fn missing(&self) -> &[usize] {
        &self.missing
    }

    /// Display names of the absent features, in schema order.
    pub fn missing_displays(&self, catalog: &FeatureCatalog) -> Vec<&'static str> {
        self.missing
            .iter()
            .map(|&i| catalog.def(i).display)
            .collect()
    }
}

/// Normalize a raw input row against the catalog.
///
/// Fails with [`Error::SchemaMismatch`] if the row names a feature the
/// schema does not contain.
pub fn normalize(catalog: &FeatureCatalog, row: &InputRow) -> Result<NormalizedInput> {
    for key in row.keys() {
        if catalog.index_of(key).is_none() {
            return Err(Error::SchemaMismatch {
                feature: key.clone(),
            });
        }
    }

    let mut values = Vec::with_capacity(catalog.len());
    let mut missing = Vec::new();
    for (index, def) in catalog.iter().enumerate() {
        match row.get(def.key) {
            Some(v) => values.push(FeatureValue::Present(*v)),
            None => {
                values.push(FeatureValue::Absent);
                missing.push(index);
            }
        }
    }

    Ok(NormalizedInput { values, missing })
}
