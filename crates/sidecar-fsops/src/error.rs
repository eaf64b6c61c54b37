//! # Design
//!
//! - Provide structured, constant-message errors for mirror file operations.
//! - Capture operation context (paths, fields, inputs) to make failures reproducible in tests.
//! - Preserve source errors without interpolating context into error messages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for filesystem operations.
pub type FsOpsResult<T> = Result<T, FsOpsError>;

/// Errors produced while mirroring entries to disk.
#[derive(Debug, Error)]
pub enum FsOpsError {
    /// IO failures while interacting with the filesystem.
    #[error("fsops io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Input validation failures.
    #[error("fsops invalid input")]
    InvalidInput {
        /// Field that failed validation.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
}

impl FsOpsError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_input(
        field: &'static str,
        reason: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidInput {
            field,
            reason,
            value: Some(value.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn fsops_error_helpers_build_variants() {
        let io_err = FsOpsError::io("write", "path", io::Error::other("io"));
        assert!(matches!(io_err, FsOpsError::Io { operation: "write", .. }));
        assert!(io_err.source().is_some());
        assert_eq!(io_err.to_string(), "fsops io failure");

        let invalid = FsOpsError::invalid_input("entry_name", "empty", "");
        assert!(matches!(
            invalid,
            FsOpsError::InvalidInput {
                field: "entry_name",
                reason: "empty",
                value: Some(_)
            }
        ));
        assert!(invalid.source().is_none());
    }
}
