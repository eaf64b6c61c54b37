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

//! Binary entrypoint for the sidecar.

use sidecar_app::{AppResult, run_app};

/// Runs the sidecar until its mode completes or a shutdown signal arrives.
#[tokio::main]
async fn main() -> AppResult<()> {
    run_app().await
}
