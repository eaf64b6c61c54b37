//! List/watch seam between the sync engine and the cluster client.

use std::pin::Pin;

use async_trait::async_trait;
use tokio_stream::Stream;

use crate::error::SourceResult;
use crate::model::{ResourceEvent, ResourceKind, ResourceRecord};
use crate::selector::SelectorConfig;

/// Boxed stream of change events for one (kind, namespace) subscription.
pub type ResourceEventStream = Pin<Box<dyn Stream<Item = SourceResult<ResourceEvent>> + Send>>;

/// Namespaces the sidecar observes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceScope {
    /// Every namespace in the cluster through a single subscription.
    All,
    /// An explicit namespace list; one subscription each.
    Named(Vec<String>),
}

impl NamespaceScope {
    /// Per-subscription namespace filters: `[None]` for the cluster-wide scope.
    #[must_use]
    pub fn partitions(&self) -> Vec<Option<&str>> {
        match self {
            Self::All => vec![None],
            Self::Named(namespaces) => namespaces.iter().map(|ns| Some(ns.as_str())).collect(),
        }
    }
}

/// Read-only access to cluster resources.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    /// Enumerate resources of `kind` in `namespace` (or all namespaces) filtered server-side.
    async fn list(
        &self,
        kind: ResourceKind,
        namespace: Option<&str>,
        selector: &SelectorConfig,
    ) -> SourceResult<Vec<ResourceRecord>>;

    /// Open a change stream for `kind` in `namespace` (or all namespaces).
    fn watch(
        &self,
        kind: ResourceKind,
        namespace: Option<&str>,
        selector: &SelectorConfig,
    ) -> ResourceEventStream;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_scope_yields_single_cluster_wide_partition() {
        assert_eq!(NamespaceScope::All.partitions(), vec![None]);
    }

    #[test]
    fn named_scope_yields_one_partition_per_namespace() {
        let scope = NamespaceScope::Named(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(scope.partitions(), vec![Some("a"), Some("b")]);
    }
}
