//! Watch workers: one task per (kind, namespace) subscription.
//!
//! # Design
//! - Workers live in a `JoinSet`; the orchestrator returns once all of them stopped.
//! - Each worker moves `Starting → Subscribed → Draining → Stopped` and `select!`s
//!   between its event stream and the shared shutdown signal.
//! - Stream errors are logged; the source's own backoff handles reconnection.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use sidecar_core::{NamespaceScope, ResourceKind, ResourceSource, SelectorConfig};
use tokio::task::JoinSet;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::shutdown::ShutdownRx;
use crate::sync::SyncPipeline;

/// Lifecycle of a watch worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Opening the subscription.
    Starting,
    /// Consuming events.
    Subscribed,
    /// Shutdown observed; releasing the subscription.
    Draining,
    /// Finished.
    Stopped,
}

impl WorkerState {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Subscribed => "subscribed",
            Self::Draining => "draining",
            Self::Stopped => "stopped",
        }
    }
}

impl Display for WorkerState {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Summary returned by a worker once it stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    /// Kind the worker observed.
    pub kind: ResourceKind,
    /// Namespace filter, `None` for the cluster-wide scope.
    pub namespace: Option<String>,
    /// Events applied.
    pub events: usize,
    /// Stream errors observed.
    pub stream_errors: usize,
    /// Final lifecycle state.
    pub state: WorkerState,
}

/// Spawns and supervises the watch workers.
pub struct WatchOrchestrator {
    source: Arc<dyn ResourceSource>,
    pipeline: Arc<SyncPipeline>,
    selector: SelectorConfig,
    kinds: Vec<ResourceKind>,
    scope: NamespaceScope,
}

impl WatchOrchestrator {
    /// Build an orchestrator over `kinds × scope`.
    #[must_use]
    pub fn new(
        source: Arc<dyn ResourceSource>,
        pipeline: Arc<SyncPipeline>,
        selector: SelectorConfig,
        kinds: Vec<ResourceKind>,
        scope: NamespaceScope,
    ) -> Self {
        Self {
            source,
            pipeline,
            selector,
            kinds,
            scope,
        }
    }

    /// Run every worker until shutdown and collect their reports.
    ///
    /// # Errors
    ///
    /// Returns an error if a worker task panicked.
    pub async fn run(&self, shutdown: ShutdownRx) -> AppResult<Vec<WorkerReport>> {
        let mut workers = JoinSet::new();
        for kind in &self.kinds {
            for namespace in self.scope.partitions() {
                let worker = Worker {
                    source: Arc::clone(&self.source),
                    pipeline: Arc::clone(&self.pipeline),
                    selector: self.selector.clone(),
                    kind: *kind,
                    namespace: namespace.map(str::to_string),
                };
                workers.spawn(worker.run(shutdown.clone()));
            }
        }
        info!(workers = workers.len(), "watch workers started");

        let mut reports = Vec::with_capacity(workers.len());
        while let Some(joined) = workers.join_next().await {
            let report = joined.map_err(|source| AppError::Worker {
                operation: "watch.join",
                source,
            })?;
            reports.push(report);
        }
        info!(workers = reports.len(), "watch workers stopped");
        Ok(reports)
    }
}

struct Worker {
    source: Arc<dyn ResourceSource>,
    pipeline: Arc<SyncPipeline>,
    selector: SelectorConfig,
    kind: ResourceKind,
    namespace: Option<String>,
}

impl Worker {
    async fn run(self, mut shutdown: ShutdownRx) -> WorkerReport {
        let namespace = self.namespace.as_deref().unwrap_or("*");
        let mut report = WorkerReport {
            kind: self.kind,
            namespace: self.namespace.clone(),
            events: 0,
            stream_errors: 0,
            state: WorkerState::Starting,
        };
        debug!(kind = %self.kind, namespace, state = %report.state, "worker state");

        let mut stream = self
            .source
            .watch(self.kind, self.namespace.as_deref(), &self.selector);
        report.state = WorkerState::Subscribed;
        info!(kind = %self.kind, namespace, state = %report.state, "worker state");

        loop {
            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                next = stream.next() => match next {
                    Some(Ok(event)) => {
                        debug!(
                            kind = %self.kind,
                            namespace,
                            event = event.label(),
                            resource = %event.record().key,
                            "event received"
                        );
                        self.pipeline.apply_event(&event).await;
                        report.events += 1;
                    }
                    Some(Err(err)) => {
                        warn!(kind = %self.kind, namespace, error = %err, "watch stream error");
                        report.stream_errors += 1;
                    }
                    None => {
                        warn!(kind = %self.kind, namespace, "watch stream ended");
                        break;
                    }
                },
            }
        }

        report.state = WorkerState::Draining;
        debug!(kind = %self.kind, namespace, state = %report.state, "worker state");
        drop(stream);
        report.state = WorkerState::Stopped;
        info!(
            kind = %self.kind,
            namespace,
            state = %report.state,
            events = report.events,
            "worker state"
        );
        report
    }
}
