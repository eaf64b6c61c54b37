//! Validated, immutable sidecar configuration.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

use sidecar_core::{NamespaceScope, ResourceKind, SelectorConfig};
use sidecar_notify::{BasicAuth, NotifyMethod, NotifyTarget};

use crate::args::SidecarArgs;
use crate::defaults::DEFAULT_FOLDER_ANNOTATION;
use crate::error::{ConfigError, ConfigResult};
use crate::validate::{
    non_empty, parse_flag, parse_namespaces, parse_resources, parse_run_mode, parse_timeout,
    required,
};

/// Top-level behaviour selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Initial pass, then follow change streams until shutdown.
    Watch,
    /// Same behaviour as [`RunMode::Watch`]; kept for compatibility.
    Sleep,
    /// One pass, then exit.
    List,
}

impl RunMode {
    /// Lowercase identifier used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Watch => "watch",
            Self::Sleep => "sleep",
            Self::List => "list",
        }
    }
}

impl Display for RunMode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Notification settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyConfig {
    /// Endpoint description; `None` disables notifications.
    pub target: Option<NotifyTarget>,
    /// Request timeout for the HTTP client.
    pub timeout: Duration,
}

/// Fully validated configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarConfig {
    /// Selected run mode.
    pub mode: RunMode,
    /// Base folder receiving mirrored files.
    pub folder: PathBuf,
    /// Annotation key naming a per-resource subdirectory.
    pub folder_annotation: String,
    /// Namespaces to observe.
    pub scope: NamespaceScope,
    /// Label filter.
    pub selector: SelectorConfig,
    /// Resource kinds to mirror, in processing order.
    pub kinds: Vec<ResourceKind>,
    /// Notification settings.
    pub notify: NotifyConfig,
    /// Suppress the notification after the initial pass in watch and sleep modes.
    pub skip_init_notify: bool,
}

impl TryFrom<SidecarArgs> for SidecarConfig {
    type Error = ConfigError;

    fn try_from(args: SidecarArgs) -> ConfigResult<Self> {
        let mode = parse_run_mode(&required("METHOD", args.method)?)?;
        let folder = args
            .folder
            .filter(|folder| !folder.as_os_str().is_empty())
            .ok_or_else(|| ConfigError::missing("FOLDER"))?;
        let label = required("LABEL", args.label)?;
        let kinds = parse_resources(&required("RESOURCE", args.resource)?)?;
        let scope = parse_namespaces(args.namespace.as_deref());
        let skip_init_notify = parse_flag("REQ_SKIP_INIT", args.req_skip_init.as_deref())?;
        let timeout = parse_timeout(args.req_timeout)?;
        let folder_annotation = non_empty(Some(args.folder_annotation))
            .unwrap_or_else(|| DEFAULT_FOLDER_ANNOTATION.to_string());

        let target = non_empty(args.req_url).map(|url| NotifyTarget {
            url,
            method: NotifyMethod::from_config(&args.req_method),
            auth: BasicAuth::from_parts(args.req_username, args.req_password),
            payload: args.req_payload.unwrap_or_default(),
        });

        Ok(Self {
            mode,
            folder,
            folder_annotation,
            scope,
            selector: SelectorConfig::new(label, args.label_value),
            kinds,
            notify: NotifyConfig { target, timeout },
            skip_init_notify,
        })
    }
}
