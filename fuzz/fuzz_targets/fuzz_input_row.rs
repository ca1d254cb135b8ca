//! Fuzz target for input row normalization.
//!
//! Tests that arbitrary JSON objects survive the parse-then-normalize path
//! without panicking.

#![no_main]

use cr_common::catalog::KNOWN_FEATURES;
use cr_common::FeatureCatalog;
use cr_core::engine::normalize::{normalize, InputRow};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let keys: Vec<String> = KNOWN_FEATURES.iter().map(|d| d.key.to_string()).collect();
    let catalog = FeatureCatalog::from_schema(&keys).unwrap();

    if let Ok(row) = serde_json::from_slice::<InputRow>(data) {
        let _ = normalize(&catalog, &row);
    }
});
