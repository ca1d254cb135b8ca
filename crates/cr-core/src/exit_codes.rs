//! Exit codes for the cr-core CLI.
//!
//! Exit codes communicate operation outcome without requiring output parsing.
//!
//! Exit code ranges:
//! - 0: Success
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors (bugs, should be reported)

use cr_common::Error;

/// Exit codes for cr-core operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success: recommendation produced (possibly with caveats)
    Success = 0,

    /// Invalid arguments or input row
    InputError = 10,

    /// Model bundle missing or invalid
    BundleError = 11,

    /// Reference dataset missing or invalid
    DatasetError = 12,

    /// I/O failure (output directory, files)
    IoError = 13,

    /// Internal error (bug - please report)
    InternalError = 20,
}

impl ExitCode {
    /// Map an engine error to its exit code.
    pub fn from_error(err: &Error) -> Self {
        match err {
            Error::SchemaMismatch { .. } => ExitCode::InputError,
            Error::Json(_) => ExitCode::InputError,
            Error::BundleInvalid(_) | Error::CatalogMismatch(_) => ExitCode::BundleError,
            Error::DatasetInvalid { .. } => ExitCode::DatasetError,
            Error::Io(_) | Error::Render(_) => ExitCode::IoError,
            Error::InsufficientClasses | Error::AttributionShape { .. } => {
                ExitCode::InternalError
            }
        }
    }

    /// Exit the process with this code.
    pub fn exit(self) -> ! {
        std::process::exit(self as i32)
    }
}
