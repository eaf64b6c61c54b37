//! Error types for configuration loading.

use thiserror::Error;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while turning flags and environment variables into a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required option was absent or empty.
    #[error("missing required configuration field")]
    MissingField {
        /// Environment variable naming the option.
        field: &'static str,
    },
    /// An option carried a value outside its accepted set.
    #[error("invalid configuration field")]
    InvalidField {
        /// Environment variable naming the option.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
}

impl ConfigError {
    pub(crate) const fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    pub(crate) fn invalid(field: &'static str, reason: &'static str, value: &str) -> Self {
        Self::InvalidField {
            field,
            reason,
            value: Some(value.to_string()),
        }
    }

    /// Option the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } | Self::InvalidField { field, .. } => *field,
        }
    }
}
