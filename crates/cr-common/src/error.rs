//! Error types for Croprec.
//!
//! Structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for callers
//! - Remediation suggestions for humans
//!
//! Propagation policy: errors caused by malformed input or broken artifacts
//! fail the request fast; sparse data (missing measurements, uncomputable
//! counterfactuals) never surfaces as an error and instead degrades to the
//! documented defaults with caveat text in the report.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for Croprec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Model bundle loading and catalog validation errors.
    Bundle,
    /// Reference dataset parsing errors.
    Dataset,
    /// Request input errors.
    Input,
    /// Ranking/explanation computation errors.
    Inference,
    /// Plot rendering errors (always recovered by the report assembler).
    Render,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Bundle => write!(f, "bundle"),
            ErrorCategory::Dataset => write!(f, "dataset"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Inference => write!(f, "inference"),
            ErrorCategory::Render => write!(f, "render"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for Croprec.
#[derive(Error, Debug)]
pub enum Error {
    // Bundle errors (10-19)
    #[error("invalid model bundle: {0}")]
    BundleInvalid(String),

    #[error("catalog mismatch: {0}")]
    CatalogMismatch(String),

    // Dataset errors (20-29)
    #[error("invalid reference dataset at line {line}: {reason}")]
    DatasetInvalid { line: usize, reason: String },

    // Input errors (30-39)
    #[error("input contains unknown feature '{feature}'")]
    SchemaMismatch { feature: String },

    // Inference errors (40-49)
    #[error("fewer than two classes available")]
    InsufficientClasses,

    #[error("attribution length {got} does not match schema length {expected}")]
    AttributionShape { got: usize, expected: usize },

    // Render errors (50-59)
    #[error("plot rendering failed: {0}")]
    Render(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the stable error code for this error type.
    ///
    /// Codes are grouped by category:
    /// - 10-19: Bundle errors
    /// - 20-29: Dataset errors
    /// - 30-39: Input errors
    /// - 40-49: Inference errors
    /// - 50-59: Render errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::BundleInvalid(_) => 10,
            Error::CatalogMismatch(_) => 11,
            Error::DatasetInvalid { .. } => 20,
            Error::SchemaMismatch { .. } => 30,
            Error::InsufficientClasses => 40,
            Error::AttributionShape { .. } => 41,
            Error::Render(_) => 50,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::BundleInvalid(_) | Error::CatalogMismatch(_) => ErrorCategory::Bundle,
            Error::DatasetInvalid { .. } => ErrorCategory::Dataset,
            Error::SchemaMismatch { .. } => ErrorCategory::Input,
            Error::InsufficientClasses | Error::AttributionShape { .. } => {
                ErrorCategory::Inference
            }
            Error::Render(_) => ErrorCategory::Render,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable by the caller.
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Artifacts must be fixed before any request can succeed.
            Error::BundleInvalid(_) => false,
            Error::CatalogMismatch(_) => false,
            Error::DatasetInvalid { .. } => false,

            // The caller can resubmit a corrected row.
            Error::SchemaMismatch { .. } => true,

            // Degraded internally; surfaces only if a caller bypasses the
            // report assembler and calls the sub-module directly.
            Error::InsufficientClasses => true,
            Error::AttributionShape { .. } => false,

            // The textual report proceeds without the image.
            Error::Render(_) => true,

            Error::Io(_) => true,
            Error::Json(_) => true,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::BundleInvalid(_) => {
                "Re-export the model bundle from training, or run 'cr-core check' to validate it."
            }
            Error::CatalogMismatch(_) => {
                "The bundle's feature schema disagrees with this build's catalog. Use a matching bundle/binary pair."
            }
            Error::DatasetInvalid { .. } => {
                "Fix the reference CSV at the reported line, or regenerate it from the training data."
            }
            Error::SchemaMismatch { .. } => {
                "Remove the unrecognized feature from the input row. Run 'cr-core check' to list known features."
            }
            Error::InsufficientClasses => {
                "The model bundle declares fewer than two classes; margin-based trust is undefined."
            }
            Error::AttributionShape { .. } => {
                "The explainer returned a vector that does not match the feature schema. Check collaborator wiring."
            }
            Error::Render(_) => {
                "The textual report is unaffected. Check output directory permissions for the missing image."
            }
            Error::Io(_) => {
                "Check disk space, permissions, and that the output directory's parent exists."
            }
            Error::Json(_) => {
                "Invalid JSON. Check syntax of the input row or bundle file."
            }
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::BundleInvalid(_) => "Invalid Model Bundle",
            Error::CatalogMismatch(_) => "Catalog Mismatch",
            Error::DatasetInvalid { .. } => "Invalid Reference Dataset",
            Error::SchemaMismatch { .. } => "Unknown Input Feature",
            Error::InsufficientClasses => "Insufficient Classes",
            Error::AttributionShape { .. } => "Attribution Shape Mismatch",
            Error::Render(_) => "Plot Rendering Failed",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Additional structured context (e.g., feature key, line number).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::SchemaMismatch { feature } => {
                context.insert("feature".to_string(), serde_json::json!(feature));
            }
            Error::DatasetInvalid { line, .. } => {
                context.insert("line".to_string(), serde_json::json!(line));
            }
            Error::AttributionShape { got, expected } => {
                context.insert("got".to_string(), serde_json::json!(got));
                context.insert("expected".to_string(), serde_json::json!(expected));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(Error::BundleInvalid("x".into()).code(), 10);
        assert_eq!(
            Error::SchemaMismatch { feature: "zinc".into() }.code(),
            30
        );
        assert_eq!(Error::Render("x".into()).code(), 50);
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            Error::CatalogMismatch("x".into()).category(),
            ErrorCategory::Bundle
        );
        assert_eq!(
            Error::DatasetInvalid { line: 3, reason: "bad field".into() }.category(),
            ErrorCategory::Dataset
        );
        assert_eq!(Error::InsufficientClasses.category(), ErrorCategory::Inference);
    }

    #[test]
    fn test_recoverability() {
        assert!(!Error::BundleInvalid("x".into()).is_recoverable());
        assert!(Error::SchemaMismatch { feature: "zinc".into() }.is_recoverable());
        assert!(Error::Render("x".into()).is_recoverable());
    }

    #[test]
    fn test_structured_error_context() {
        let err = Error::SchemaMismatch { feature: "zinc".into() };
        let structured = StructuredError::from(&err);

        assert_eq!(structured.code, 30);
        assert_eq!(structured.category, ErrorCategory::Input);
        assert!(structured.recoverable);
        assert_eq!(
            structured.context.get("feature"),
            Some(&serde_json::json!("zinc"))
        );
    }

    #[test]
    fn test_structured_error_json() {
        let err = Error::DatasetInvalid { line: 17, reason: "non-numeric field".into() };
        let json = StructuredError::from(&err).to_json();

        assert!(json.contains(r#""code":20"#));
        assert!(json.contains(r#""category":"dataset""#));
        assert!(json.contains(r#""line":17"#));
    }

    #[test]
    fn test_format_error_human() {
        let err = Error::SchemaMismatch { feature: "zinc".into() };
        let formatted = format_error_human(&err, false);

        assert!(formatted.contains("Unknown Input Feature"));
        assert!(formatted.contains("zinc"));
        assert!(formatted.contains("cr-core check"));
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::Bundle.to_string(), "bundle");
        assert_eq!(ErrorCategory::Render.to_string(), "render");
    }
}
