//! Command-line flags, each backed by an environment variable.

use std::path::PathBuf;

use clap::Parser;

use crate::defaults::{DEFAULT_FOLDER_ANNOTATION, DEFAULT_REQ_METHOD, DEFAULT_TIMEOUT_SECS};

/// Raw options as provided by flags or the environment. Validated by
/// [`SidecarConfig::try_from`](crate::SidecarConfig).
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sidecar",
    about = "Mirror labelled ConfigMap and Secret JSON entries into a local folder"
)]
pub struct SidecarArgs {
    /// Run mode: `watch`, `list` or `sleep`.
    #[arg(long, env = "METHOD")]
    pub method: Option<String>,
    /// Comma-separated namespaces; empty or `ALL` observes the whole cluster.
    #[arg(long, env = "NAMESPACE")]
    pub namespace: Option<String>,
    /// Base folder receiving mirrored files.
    #[arg(long, env = "FOLDER")]
    pub folder: Option<PathBuf>,
    /// Label key a resource must carry.
    #[arg(long, env = "LABEL")]
    pub label: Option<String>,
    /// Label value a resource must carry; any value when unset.
    #[arg(long, env = "LABEL_VALUE")]
    pub label_value: Option<String>,
    /// Resource kinds to mirror: `configmap`, `secret` or `both`.
    #[arg(long, env = "RESOURCE")]
    pub resource: Option<String>,
    /// Notification endpoint; notifications are skipped when unset.
    #[arg(long, env = "REQ_URL")]
    pub req_url: Option<String>,
    /// Notification verb; only `POST` switches away from GET.
    #[arg(long, env = "REQ_METHOD", default_value = DEFAULT_REQ_METHOD)]
    pub req_method: String,
    /// Notification request body.
    #[arg(long, env = "REQ_PAYLOAD")]
    pub req_payload: Option<String>,
    /// Basic auth username for the notification endpoint.
    #[arg(long, env = "REQ_USERNAME")]
    pub req_username: Option<String>,
    /// Basic auth password for the notification endpoint.
    #[arg(long, env = "REQ_PASSWORD", hide_env_values = true)]
    pub req_password: Option<String>,
    /// Annotation key naming a per-resource subdirectory.
    #[arg(long, env = "FOLDER_ANNOTATION", default_value = DEFAULT_FOLDER_ANNOTATION)]
    pub folder_annotation: String,
    /// Skip the notification that follows the initial pass in watch mode.
    #[arg(long, env = "REQ_SKIP_INIT")]
    pub req_skip_init: Option<String>,
    /// Notification request timeout in seconds.
    #[arg(long, env = "REQ_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub req_timeout: u64,
    /// Log level: `DEBUG`, `INFO`, `WARN` or `ERROR`. `RUST_LOG` takes precedence.
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,
    /// Log output format: `json` or `pretty`.
    #[arg(long, env = "LOG_FORMAT")]
    pub log_format: Option<String>,
}
