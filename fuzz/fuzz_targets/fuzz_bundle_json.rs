//! Fuzz target for model bundle JSON parsing.
//!
//! Tests that bundle parsing handles arbitrary input without panicking.
//! Bundles are produced offline and may arrive truncated or corrupted.

#![no_main]

use cr_core::bundle::ModelBundle;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        // Parsing plus validation - should never panic, only return an error
        let _ = ModelBundle::from_json(raw);
    }
});
