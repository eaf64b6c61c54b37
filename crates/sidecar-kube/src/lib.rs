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

//! Cluster adapter implementing [`sidecar_core::ResourceSource`] on top of `kube`.
//!
//! Layout: `convert.rs` (typed objects to records and watcher signals), `source.rs`
//! (list and watch against the API server).

pub mod convert;
pub mod source;

pub use convert::MirroredResource;
pub use source::KubeSource;
