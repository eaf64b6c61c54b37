//! Error types for resource source adapters.

use std::error::Error;

use thiserror::Error;

use crate::model::ResourceKind;

/// Errors raised while listing or watching cluster resources.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Building the cluster client failed.
    #[error("cluster client initialisation failed")]
    ClientInit {
        /// Underlying client error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A list request failed.
    #[error("resource list failed")]
    List {
        /// Kind being listed.
        kind: ResourceKind,
        /// Namespace scope, `None` for cluster-wide.
        namespace: Option<String>,
        /// Underlying client error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A watch stream reported an error.
    #[error("resource watch failed")]
    Watch {
        /// Kind being watched.
        kind: ResourceKind,
        /// Namespace scope, `None` for cluster-wide.
        namespace: Option<String>,
        /// Underlying watch error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

/// Convenience alias for source results.
pub type SourceResult<T> = Result<T, SourceError>;

impl SourceError {
    /// Wrap a list failure.
    pub fn list(
        kind: ResourceKind,
        namespace: Option<&str>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self::List {
            kind,
            namespace: namespace.map(str::to_string),
            source: source.into(),
        }
    }

    /// Wrap a watch failure.
    pub fn watch(
        kind: ResourceKind,
        namespace: Option<&str>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self::Watch {
            kind,
            namespace: namespace.map(str::to_string),
            source: source.into(),
        }
    }
}
