//! Run-mode dispatch and the initial list pass.

use std::sync::Arc;

use sidecar_config::{RunMode, SidecarConfig};
use sidecar_core::ResourceSource;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::orchestrator::WatchOrchestrator;
use crate::shutdown::ShutdownRx;
use crate::sync::SyncPipeline;

/// Totals for one list pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Resources returned by the cluster.
    pub resources: usize,
    /// Files written.
    pub files: usize,
    /// Whether a notification was delivered after the pass.
    pub notified: bool,
}

/// Drives the configured run mode.
pub struct RunModeController {
    config: SidecarConfig,
    source: Arc<dyn ResourceSource>,
    pipeline: Arc<SyncPipeline>,
}

impl RunModeController {
    /// Build a controller for `config`.
    #[must_use]
    pub fn new(
        config: SidecarConfig,
        source: Arc<dyn ResourceSource>,
        pipeline: Arc<SyncPipeline>,
    ) -> Self {
        Self {
            config,
            source,
            pipeline,
        }
    }

    /// Run the configured mode to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial pass fails or a watch worker panics.
    pub async fn run(&self, shutdown: ShutdownRx) -> AppResult<()> {
        match self.config.mode {
            RunMode::List => {
                self.run_once().await?;
                Ok(())
            }
            RunMode::Watch => self.watch(shutdown).await,
            RunMode::Sleep => {
                warn!("sleep mode behaves exactly like watch mode");
                self.watch(shutdown).await
            }
        }
    }

    /// List every configured kind and namespace, write all accepted entries, then
    /// fire one notification.
    ///
    /// # Errors
    ///
    /// Returns an error if a list call or a filesystem write fails.
    pub async fn run_once(&self) -> AppResult<PassSummary> {
        self.initial_pass(true).await
    }

    /// Initial pass followed by watch workers until shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial pass fails or a watch worker panics.
    pub async fn watch(&self, shutdown: ShutdownRx) -> AppResult<()> {
        self.initial_pass(!self.config.skip_init_notify).await?;

        let orchestrator = WatchOrchestrator::new(
            Arc::clone(&self.source),
            Arc::clone(&self.pipeline),
            self.config.selector.clone(),
            self.config.kinds.clone(),
            self.config.scope.clone(),
        );
        let reports = orchestrator.run(shutdown).await?;
        let events: usize = reports.iter().map(|report| report.events).sum();
        info!(workers = reports.len(), events, "watch finished");
        Ok(())
    }

    async fn initial_pass(&self, notify: bool) -> AppResult<PassSummary> {
        let mut summary = PassSummary::default();
        for kind in &self.config.kinds {
            for namespace in self.config.scope.partitions() {
                let records = self
                    .source
                    .list(*kind, namespace, &self.config.selector)
                    .await
                    .map_err(|err| AppError::cluster("run_once.list", err))?;
                info!(
                    kind = %kind,
                    namespace = namespace.unwrap_or("*"),
                    count = records.len(),
                    "resources listed"
                );
                summary.resources += records.len();
                for record in &records {
                    summary.files += self.pipeline.materialize(record)?;
                }
            }
        }
        info!(
            resources = summary.resources,
            files = summary.files,
            folder = %self.pipeline.folder().display(),
            "initial pass complete"
        );

        if notify {
            summary.notified = self.pipeline.notify().await;
        }
        Ok(summary)
    }
}
