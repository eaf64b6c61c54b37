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

//! Filesystem side of the mirror: which entries qualify, where they land, and the
//! idempotent write/remove primitives.

pub mod error;
pub mod filter;
pub mod path;
pub mod service;

pub use error::{FsOpsError, FsOpsResult};
pub use filter::{JSON_SUFFIX, accepts_entry};
pub use path::resolve_target_folder;
pub use service::{FileModes, FileSync};
