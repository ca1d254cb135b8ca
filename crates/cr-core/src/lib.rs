//! Croprec Core Library
//!
//! This library provides the core functionality for crop recommendation
//! explanation:
//! - Model bundle and reference dataset loading
//! - Input normalization against the feature schema
//! - Top-K ranking with a trust assessment
//! - Attribution narration and adjustment suggestions
//! - Counterfactual search across class profiles
//! - Report assembly with best-effort plot rendering
//!
//! The binary entry point is in `main.rs`.

pub mod bundle;
pub mod context;
pub mod dataset;
pub mod engine;
pub mod exit_codes;
pub mod logging;
pub mod model;
pub mod plot;

#[cfg(test)]
pub(crate) mod test_utils;

pub use context::EngineContext;
pub use engine::report::{generate_recommendation, Recommendation};
