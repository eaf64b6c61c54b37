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

//! Startup configuration for the sidecar.
//!
//! Every option is read once from a command-line flag or its environment variable
//! (`args.rs`), then validated into an immutable [`SidecarConfig`] (`model.rs`,
//! `validate.rs`). Defaults live in `defaults.rs`.

pub mod args;
pub mod defaults;
pub mod error;
pub mod model;
mod validate;

pub use args::SidecarArgs;
pub use error::{ConfigError, ConfigResult};
pub use model::{NotifyConfig, RunMode, SidecarConfig};
