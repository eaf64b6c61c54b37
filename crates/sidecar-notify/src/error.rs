//! Error types for outbound notifications.

use thiserror::Error;

/// Result alias for notifier operations.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Errors raised while delivering a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Building the HTTP client failed.
    #[error("notifier client construction failed")]
    Client {
        /// Source HTTP client error.
        source: reqwest::Error,
    },
    /// The request could not be delivered (DNS, connection, timeout).
    #[error("notification transport failed")]
    Transport {
        /// URL used for the request.
        url: String,
        /// Source HTTP client error.
        source: reqwest::Error,
    },
    /// The endpoint answered with a non-success status.
    #[error("notification rejected by endpoint")]
    Status {
        /// URL used for the request.
        url: String,
        /// HTTP status code returned by the server.
        status: u16,
    },
}

impl NotifyError {
    pub(crate) fn transport(url: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.to_string(),
            source,
        }
    }

    /// HTTP status carried by the error, if the endpoint answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Client { .. } | Self::Transport { .. } => None,
        }
    }
}
