//! Default values applied when an option is not configured.

/// Annotation key naming a per-resource subdirectory.
pub const DEFAULT_FOLDER_ANNOTATION: &str = "k8s-sidecar-target-directory";
/// HTTP verb used for notifications unless `POST` is configured.
pub const DEFAULT_REQ_METHOD: &str = "GET";
/// Notification request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Namespace value meaning "every namespace".
pub(crate) const ALL_NAMESPACES: &str = "all";
/// Resource value meaning "configmaps and secrets".
pub(crate) const BOTH_RESOURCES: &str = "both";
