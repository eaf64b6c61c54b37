//! reqwest-backed notifier.
//!
//! # Design
//! - The request is fully derived from configuration; nothing about the triggering
//!   event is sent.
//! - GET is the default. POST is used only when explicitly configured.
//! - No retry and no backoff: a failed call is returned to the caller, which logs it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use tracing::{debug, info, warn};

use crate::Notifier;
use crate::error::{NotifyError, NotifyResult};

/// HTTP verb used for the notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotifyMethod {
    /// Plain GET; also used for empty or unrecognised configuration.
    #[default]
    Get,
    /// POST carrying the payload.
    Post,
}

impl NotifyMethod {
    /// Map a configured method name; anything other than `POST` becomes GET.
    #[must_use]
    pub fn from_config(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("post") {
            Self::Post
        } else {
            Self::Get
        }
    }

    const fn as_method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
        }
    }
}

/// HTTP Basic credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

impl BasicAuth {
    /// Credentials are attached only when both parts are present and non-empty.
    #[must_use]
    pub fn from_parts(username: Option<String>, password: Option<String>) -> Option<Self> {
        match (username, password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some(Self { username, password })
            }
            _ => None,
        }
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where and how to send the notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyTarget {
    /// Endpoint URL.
    pub url: String,
    /// HTTP verb.
    pub method: NotifyMethod,
    /// Optional Basic credentials.
    pub auth: Option<BasicAuth>,
    /// Fixed request body, sent for GET as well.
    pub payload: String,
}

/// Notifier that issues one HTTP request per call.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: Client,
    target: Option<NotifyTarget>,
}

impl HttpNotifier {
    /// Build a notifier. With no target every call succeeds without sending anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(target: Option<NotifyTarget>, timeout: Duration) -> NotifyResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| NotifyError::Client { source })?;
        Ok(Self { client, target })
    }

    /// Configured target, if any.
    #[must_use]
    pub const fn target(&self) -> Option<&NotifyTarget> {
        self.target.as_ref()
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self) -> NotifyResult<()> {
        let Some(target) = &self.target else {
            debug!("notification url not configured; skipping");
            return Ok(());
        };

        let mut request = self
            .client
            .request(target.method.as_method(), &target.url)
            .body(target.payload.clone());
        if let Some(auth) = &target.auth {
            request = request.basic_auth(&auth.username, Some(&auth.password));
        }

        let response = request
            .send()
            .await
            .map_err(|err| NotifyError::transport(&target.url, err))?;
        let status = response.status();
        if !status.is_success() {
            warn!(url = %target.url, status = status.as_u16(), "notification endpoint rejected request");
            return Err(NotifyError::Status {
                url: target.url.clone(),
                status: status.as_u16(),
            });
        }

        info!(url = %target.url, status = status.as_u16(), "notification delivered");
        Ok(())
    }
}
