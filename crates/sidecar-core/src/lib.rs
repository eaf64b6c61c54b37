#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::multiple_crate_versions)]

//! Cluster-agnostic resource model shared by the sidecar crates.
//!
//! Layout: `model.rs` (records and tagged events), `selector.rs` (label matching),
//! `classify.rs` (add/update/delete classification), `source.rs` (list/watch seam).

pub mod classify;
pub mod error;
pub mod model;
pub mod selector;
pub mod source;

pub use classify::{EventClassifier, WatchSignal};
pub use error::{SourceError, SourceResult};
pub use model::{EntryData, ResourceEvent, ResourceKey, ResourceKind, ResourceRecord};
pub use selector::SelectorConfig;
pub use source::{NamespaceScope, ResourceEventStream, ResourceSource};
