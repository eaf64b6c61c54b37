//! # Design
//!
//! - Centralize application-level errors for bootstrap and run modes.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use std::io;

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: sidecar_config::ConfigError,
    },
    /// Telemetry operations failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: sidecar_telemetry::TelemetryError,
    },
    /// Listing or watching cluster resources failed.
    #[error("cluster operation failed")]
    Source {
        /// Operation identifier.
        operation: &'static str,
        /// Source cluster error.
        source: sidecar_core::SourceError,
    },
    /// Writing or removing mirror files failed.
    #[error("filesystem operation failed")]
    FsOps {
        /// Operation identifier.
        operation: &'static str,
        /// Source filesystem error.
        source: sidecar_fsops::FsOpsError,
    },
    /// The notifier could not be constructed.
    #[error("notifier operation failed")]
    Notify {
        /// Operation identifier.
        operation: &'static str,
        /// Source notifier error.
        source: sidecar_notify::NotifyError,
    },
    /// IO operations failed.
    #[error("io operation failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Source IO error.
        source: io::Error,
    },
    /// A worker task panicked or was cancelled.
    #[error("worker task failed")]
    Worker {
        /// Operation identifier.
        operation: &'static str,
        /// Source join error.
        source: tokio::task::JoinError,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: sidecar_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: sidecar_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn cluster(operation: &'static str, source: sidecar_core::SourceError) -> Self {
        Self::Source { operation, source }
    }

    pub(crate) const fn fsops(operation: &'static str, source: sidecar_fsops::FsOpsError) -> Self {
        Self::FsOps { operation, source }
    }

    pub(crate) const fn notify(
        operation: &'static str,
        source: sidecar_notify::NotifyError,
    ) -> Self {
        Self::Notify { operation, source }
    }

    #[cfg(unix)]
    pub(crate) const fn io(operation: &'static str, source: io::Error) -> Self {
        Self::Io { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn app_error_messages_are_constant() {
        let cases = vec![
            (
                AppError::config(
                    "config.parse",
                    sidecar_config::ConfigError::MissingField { field: "FOLDER" },
                ),
                "configuration operation failed",
            ),
            (
                AppError::Io {
                    operation: "signal.register",
                    source: io::Error::other("denied"),
                },
                "io operation failed",
            ),
            (
                AppError::notify(
                    "notify.client",
                    sidecar_notify::NotifyError::Status {
                        url: "http://localhost".to_string(),
                        status: 500,
                    },
                ),
                "notifier operation failed",
            ),
        ];
        for (err, message) in cases {
            assert_eq!(err.to_string(), message);
            assert!(err.source().is_some());
        }
    }
}
