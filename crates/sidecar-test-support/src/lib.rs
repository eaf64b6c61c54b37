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

//! Shared test helpers used across sidecar suites.
//! Layout: fixtures.rs (record builders), mocks.rs (fake cluster and notifier).

pub mod fixtures;
pub mod mocks;

pub use mocks::{FakeCluster, RecordingNotifier};
