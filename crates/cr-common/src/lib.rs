//! Croprec common types and errors.
//!
//! This crate provides foundational types shared across cr-core modules:
//! - The feature catalog (keys, display names, modifiable flags)
//! - Tagged feature values with an explicit absent marker
//! - Common error types with stable codes
//! - Output format specifications

pub mod catalog;
pub mod error;
pub mod output;
pub mod value;

pub use catalog::{FeatureCatalog, FeatureDef, KNOWN_FEATURES};
pub use error::{format_error_human, Error, ErrorCategory, Result, StructuredError};
pub use output::OutputFormat;
pub use value::FeatureValue;
