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

//! Side-effect notification for consumers of the mirrored files.
//!
//! Layout: `http.rs` (reqwest-backed notifier), `error.rs` (`NotifyError`).

use async_trait::async_trait;

pub mod error;
pub mod http;

pub use error::{NotifyError, NotifyResult};
pub use http::{BasicAuth, HttpNotifier, NotifyMethod, NotifyTarget};

/// Signal sent after mirrored files change. Failures are reported, never retried.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Fire one notification.
    async fn notify(&self) -> NotifyResult<()>;
}
