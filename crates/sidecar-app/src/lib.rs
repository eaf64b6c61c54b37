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
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions)]

//! Sidecar application wiring.
//!
//! Layout: `bootstrap.rs` (process wiring), `controller.rs` (run modes and the
//! initial pass), `orchestrator.rs` (watch workers), `sync.rs` (resource to file
//! pipeline), `shutdown.rs` (signal broadcast).

/// Process wiring and entry points.
pub mod bootstrap;
/// Run-mode dispatch.
pub mod controller;
/// Application error type.
pub mod error;
/// Watch worker supervision.
pub mod orchestrator;
/// Shutdown signal plumbing.
pub mod shutdown;
/// Resource to filesystem pipeline.
pub mod sync;

pub use bootstrap::{BootstrapDependencies, run_app, run_app_with};
pub use controller::{PassSummary, RunModeController};
pub use error::{AppError, AppResult};
pub use orchestrator::{WatchOrchestrator, WorkerReport, WorkerState};
pub use shutdown::{ShutdownRx, ShutdownTx, create_shutdown_channel};
pub use sync::{ApplyReport, SyncPipeline};
