//! Resource records and the tagged change events produced by source adapters.
//!
//! # Design
//! - Both supported kinds collapse into one `ResourceRecord` so the sync pipeline is
//!   written once.
//! - Entry content is carried as raw bytes; `ConfigMap` text and `Secret` bytes are
//!   mirrored verbatim.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Entry name to raw content mapping carried by a resource.
pub type EntryData = BTreeMap<String, Vec<u8>>;

/// Cluster object kinds the sidecar knows how to mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    /// Plain key/value configuration objects.
    ConfigMap,
    /// Access-restricted key/value objects.
    Secret,
}

impl ResourceKind {
    /// Both supported kinds, in processing order.
    pub const ALL: [Self; 2] = [Self::ConfigMap, Self::Secret];

    /// Lowercase identifier used in configuration and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConfigMap => "configmap",
            Self::Secret => "secret",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "configmap" => Ok(Self::ConfigMap),
            "secret" => Ok(Self::Secret),
            other => Err(other.to_string()),
        }
    }
}

/// Stable identity of an observed object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey {
    /// Object kind.
    pub kind: ResourceKind,
    /// Namespace the object lives in (empty for cluster-scoped payloads).
    pub namespace: String,
    /// Object name.
    pub name: String,
}

impl Display for ResourceKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}/{}/{}", self.kind, self.namespace, self.name)
    }
}

/// Observed cluster object reduced to the fields the sync pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    /// Object identity.
    pub key: ResourceKey,
    /// Labels attached to the object.
    pub labels: BTreeMap<String, String>,
    /// Annotations attached to the object.
    pub annotations: BTreeMap<String, String>,
    /// Data entries; each one is a candidate mirror file.
    pub data: EntryData,
}

impl ResourceRecord {
    /// Build an empty record for the given identity.
    #[must_use]
    pub fn new(kind: ResourceKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: ResourceKey {
                kind,
                namespace: namespace.into(),
                name: name.into(),
            },
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
            data: EntryData::new(),
        }
    }

    /// Attach a label.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Attach an annotation.
    #[must_use]
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Attach a data entry.
    #[must_use]
    pub fn with_entry(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.data.insert(name.into(), content.into());
        self
    }

    /// Object kind.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.key.kind
    }

    /// Object namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.key.namespace
    }

    /// Object name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.key.name
    }
}

/// Change notification delivered by a watch subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceEvent {
    /// Object observed for the first time.
    Added(ResourceRecord),
    /// Previously observed object changed.
    Updated {
        /// Current state.
        record: ResourceRecord,
        /// State before the change, when the producer tracked it.
        previous: Option<Box<ResourceRecord>>,
    },
    /// Object removed; carries its last known state.
    Deleted(ResourceRecord),
}

impl ResourceEvent {
    /// Record carried by the event.
    #[must_use]
    pub const fn record(&self) -> &ResourceRecord {
        match self {
            Self::Added(record) | Self::Updated { record, .. } | Self::Deleted(record) => record,
        }
    }

    /// State replaced by an update, if known.
    #[must_use]
    pub fn previous(&self) -> Option<&ResourceRecord> {
        match self {
            Self::Updated { previous, .. } => previous.as_deref(),
            Self::Added(_) | Self::Deleted(_) => None,
        }
    }

    /// Short label for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Added(_) => "added",
            Self::Updated { .. } => "updated",
            Self::Deleted(_) => "deleted",
        }
    }
}
