//! Fuzz target for reference dataset CSV parsing.
//!
//! Tests that the profile reader handles arbitrary input without panicking.

#![no_main]

use cr_common::catalog::KNOWN_FEATURES;
use cr_common::FeatureCatalog;
use cr_core::dataset::profile_from_csv;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let keys: Vec<String> = KNOWN_FEATURES.iter().map(|d| d.key.to_string()).collect();
    let catalog = FeatureCatalog::from_schema(&keys).unwrap();

    if let Ok(raw) = std::str::from_utf8(data) {
        // Should never panic, only return an error with a line number
        let _ = profile_from_csv(raw, &catalog);
    }
});
