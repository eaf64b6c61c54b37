//! Process-wide shutdown signal.
//!
//! # Design
//! - One `watch` channel carries the signal; every worker holds a receiver clone and
//!   `select!`s on it next to its event stream.
//! - A dropped sender counts as shutdown.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::AppResult;

/// Receiving half of the shutdown signal.
pub type ShutdownRx = watch::Receiver<()>;

/// Sending half of the shutdown signal.
#[derive(Debug, Clone)]
pub struct ShutdownTx(watch::Sender<()>);

impl ShutdownTx {
    /// Broadcast shutdown to every receiver.
    pub fn shutdown(&self) {
        if self.0.send(()).is_err() {
            warn!("shutdown requested with no remaining receivers");
        }
    }

    /// New receiver observing the same signal.
    #[must_use]
    pub fn subscribe(&self) -> ShutdownRx {
        self.0.subscribe()
    }
}

/// Create a connected shutdown sender and receiver.
#[must_use]
pub fn create_shutdown_channel() -> (ShutdownTx, ShutdownRx) {
    let (tx, rx) = watch::channel(());
    (ShutdownTx(tx), rx)
}

/// Resolve once the shutdown signal fires or its sender is dropped.
pub async fn wait_for_shutdown(shutdown: &mut ShutdownRx) {
    let _ = shutdown.changed().await;
}

/// Spawn a task that turns SIGINT or SIGTERM into a shutdown broadcast.
///
/// # Errors
///
/// Returns an error if the SIGTERM handler cannot be registered.
pub fn spawn_signal_listener(shutdown: ShutdownTx) -> AppResult<JoinHandle<()>> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        use crate::error::AppError;

        let mut sigterm = signal(SignalKind::terminate())
            .map_err(|err| AppError::io("signal.register_sigterm", err))?;
        Ok(tokio::spawn(async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => info!("SIGINT received, shutting down"),
                _ = sigterm.recv() => info!("SIGTERM received, shutting down"),
            }
            shutdown.shutdown();
        }))
    }
    #[cfg(not(unix))]
    {
        Ok(tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, shutting down");
            }
            shutdown.shutdown();
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn receivers_observe_shutdown() {
        let (tx, rx) = create_shutdown_channel();
        let mut first = rx.clone();
        let mut second = tx.subscribe();
        tx.shutdown();

        let timeout = Duration::from_secs(1);
        assert!(tokio::time::timeout(timeout, wait_for_shutdown(&mut first)).await.is_ok());
        assert!(tokio::time::timeout(timeout, wait_for_shutdown(&mut second)).await.is_ok());
    }

    #[tokio::test]
    async fn dropped_sender_counts_as_shutdown() {
        let (tx, mut rx) = create_shutdown_channel();
        drop(tx);
        let waited = tokio::time::timeout(Duration::from_secs(1), wait_for_shutdown(&mut rx)).await;
        assert!(waited.is_ok());
    }
}
