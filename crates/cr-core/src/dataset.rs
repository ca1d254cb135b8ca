//! Reference dataset reader.
//!
//! Parses the labeled reference CSV and derives the class-conditional mean
//! profile used by the adjustment advisor and the counterfactual searcher.
//! The profile is keyed by class label in a `BTreeMap`, so iteration order
//! is lexical and reproducible across runs and platforms; the counterfactual
//! tie-break depends on this.
//!
//! Expected shape: a header row naming every schema feature plus a `label`
//! column, then one numeric row per labeled sample. Parsing is strict; a
//! malformed field fails with the offending line number rather than silently
//! skewing the means.

use std::collections::BTreeMap;
use std::path::Path;

use cr_common::{Error, FeatureCatalog, Result};

/// Class label → per-feature means in catalog order.
pub type ReferenceProfile = BTreeMap<String, Vec<f64>>;

/// Column name carrying the class label.
const LABEL_COLUMN: &str = "label";

/// Load the reference dataset and compute per-class feature means.
pub fn load_profile(path: &Path, catalog: &FeatureCatalog) -> Result<ReferenceProfile> {
    let raw = std::fs::read_to_string(path)?;
    profile_from_csv(&raw, catalog)
}

/// Compute per-class feature means from CSV text.
pub fn profile_from_csv(raw: &str, catalog: &FeatureCatalog) -> Result<ReferenceProfile> {
    let mut lines = raw.lines().enumerate();

    let (_, header) = lines.next().ok_or(Error::DatasetInvalid {
        line: 1,
        reason: "dataset is empty".into(),
    })?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();

    let label_col = columns
        .iter()
        .position(|c| *c == LABEL_COLUMN)
        .ok_or(Error::DatasetInvalid {
            line: 1,
            reason: format!("header has no '{LABEL_COLUMN}' column"),
        })?;

    // Map each catalog feature to its CSV column, failing fast on any
    // feature the dataset does not carry.
    let mut feature_cols = Vec::with_capacity(catalog.len());
    for def in catalog.iter() {
        let col = columns
            .iter()
            .position(|c| *c == def.key)
            .ok_or(Error::DatasetInvalid {
                line: 1,
                reason: format!("header has no '{}' column", def.key),
            })?;
        feature_cols.push(col);
    }

    let mut sums: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();

    for (idx, line) in lines {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != columns.len() {
            return Err(Error::DatasetInvalid {
                line: line_no,
                reason: format!(
                    "expected {} fields, found {}",
                    columns.len(),
                    fields.len()
                ),
            });
        }

        let label = fields[label_col];
        if label.is_empty() {
            return Err(Error::DatasetInvalid {
                line: line_no,
                reason: "empty class label".into(),
            });
        }

        let sum = sums
            .entry(label.to_string())
            .or_insert_with(|| vec![0.0; catalog.len()]);
        for (feat_idx, col) in feature_cols.iter().enumerate() {
            let value: f64 = fields[*col].parse().map_err(|_| Error::DatasetInvalid {
                line: line_no,
                reason: format!("non-numeric value '{}' for '{}'", fields[*col],
                    catalog.def(feat_idx).key),
            })?;
            sum[feat_idx] += value;
        }
        *counts.entry(label.to_string()).or_insert(0) += 1;
    }

    if sums.is_empty() {
        return Err(Error::DatasetInvalid {
            line: 1,
            reason: "dataset has a header but no rows".into(),
        });
    }

    let mut profile = ReferenceProfile::new();
    for (label, sum) in sums {
        let n = counts[&label] as f64;
        profile.insert(label, sum.into_iter().map(|s| s / n).collect());
    }
    Ok(profile)
}

/// Verify the profile covers every class the classifier can emit.
///
/// `line: 0` marks a whole-file problem rather than a specific row.
pub fn validate_profile_coverage(profile: &ReferenceProfile, classes: &[String]) -> Result<()> {
    for class in classes {
        if !profile.contains_key(class) {
            return Err(Error::DatasetInvalid {
                line: 0,
                reason: format!("reference dataset has no rows for class '{class}'"),
            });
        }
    }
    Ok(())
}
