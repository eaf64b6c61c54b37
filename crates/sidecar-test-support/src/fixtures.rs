//! Record builders for common test objects.

use sidecar_core::{ResourceKind, ResourceRecord};

/// Label key used by the default fixtures.
pub const DASHBOARD_LABEL: &str = "grafana_dashboard";
/// Namespace used by the default fixtures.
pub const DEFAULT_NAMESPACE: &str = "monitoring";

/// ConfigMap in [`DEFAULT_NAMESPACE`] labelled `grafana_dashboard=1` with the given entries.
#[must_use]
pub fn dashboard_config_map(name: &str, entries: &[(&str, &str)]) -> ResourceRecord {
    labelled(ResourceKind::ConfigMap, DEFAULT_NAMESPACE, name, entries)
}

/// Secret in [`DEFAULT_NAMESPACE`] labelled `grafana_dashboard=1` with the given entries.
#[must_use]
pub fn dashboard_secret(name: &str, entries: &[(&str, &str)]) -> ResourceRecord {
    labelled(ResourceKind::Secret, DEFAULT_NAMESPACE, name, entries)
}

/// Record of `kind` in `namespace` labelled `grafana_dashboard=1`.
#[must_use]
pub fn labelled(
    kind: ResourceKind,
    namespace: &str,
    name: &str,
    entries: &[(&str, &str)],
) -> ResourceRecord {
    entries.iter().fold(
        ResourceRecord::new(kind, namespace, name).with_label(DASHBOARD_LABEL, "1"),
        |record, (entry, content)| record.with_entry(*entry, content.as_bytes()),
    )
}
