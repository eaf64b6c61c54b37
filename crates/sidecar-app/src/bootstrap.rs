//! Process wiring: configuration, logging, cluster client, notifier, run mode.

use std::sync::Arc;

use clap::Parser;
use sidecar_config::{SidecarArgs, SidecarConfig};
use sidecar_core::ResourceSource;
use sidecar_fsops::FileSync;
use sidecar_kube::KubeSource;
use sidecar_notify::{HttpNotifier, Notifier};
use sidecar_telemetry::{GlobalContextGuard, LogFormat, LoggingConfig, normalize_level};
use tracing::{error, info};

use crate::controller::RunModeController;
use crate::error::{AppError, AppResult};
use crate::shutdown::{create_shutdown_channel, spawn_signal_listener};
use crate::sync::SyncPipeline;

const BUILD_SHA: &str = match option_env!("SIDECAR_BUILD_SHA") {
    Some(sha) => sha,
    None => "dev",
};

/// Everything the run modes need, constructed once at startup.
pub struct BootstrapDependencies {
    config: SidecarConfig,
    source: Arc<dyn ResourceSource>,
    notifier: Arc<dyn Notifier>,
    files: FileSync,
}

impl BootstrapDependencies {
    /// Assemble dependencies from already-built collaborators.
    #[must_use]
    pub fn new(
        config: SidecarConfig,
        source: Arc<dyn ResourceSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            source,
            notifier,
            files: FileSync::new(),
        }
    }

    /// Production dependencies: live cluster client and HTTP notifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the cluster client or the HTTP client cannot be built.
    pub async fn from_config(config: SidecarConfig) -> AppResult<Self> {
        let source = KubeSource::connect()
            .await
            .map_err(|err| AppError::cluster("kube.connect", err))?;
        let notifier = HttpNotifier::new(config.notify.target.clone(), config.notify.timeout)
            .map_err(|err| AppError::notify("notifier.new", err))?;
        Ok(Self::new(config, Arc::new(source), Arc::new(notifier)))
    }
}

/// Entry point for the binary: read options, install logging, run the selected mode.
///
/// # Errors
///
/// Returns an error on invalid configuration, cluster client failure, or a failed
/// initial pass.
#[allow(clippy::future_not_send)]
pub async fn run_app() -> AppResult<()> {
    let args = SidecarArgs::parse();
    let logging = LoggingConfig {
        level: normalize_level(args.log_level.as_deref()),
        format: LogFormat::from_config(args.log_format.as_deref()),
        build_sha: BUILD_SHA,
    };
    sidecar_telemetry::init_logging(&logging)
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;

    let result = async {
        let config =
            SidecarConfig::try_from(args).map_err(|err| AppError::config("config.load", err))?;
        let _context = GlobalContextGuard::new(config.mode.as_str());
        let dependencies = BootstrapDependencies::from_config(config).await?;
        run_app_with(dependencies).await
    }
    .await;

    if let Err(err) = &result {
        error!(error = %err, detail = ?err, "sidecar stopped with an error");
    }
    result
}

/// Run the configured mode with injected dependencies until it completes or a
/// shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if the signal handler cannot be installed or the run mode fails.
pub async fn run_app_with(dependencies: BootstrapDependencies) -> AppResult<()> {
    let BootstrapDependencies {
        config,
        source,
        notifier,
        files,
    } = dependencies;

    info!(
        mode = %config.mode,
        folder = %config.folder.display(),
        kinds = ?config.kinds,
        scope = ?config.scope,
        notifications = config.notify.target.is_some(),
        "sidecar starting"
    );

    let pipeline = Arc::new(SyncPipeline::new(
        files,
        notifier,
        config.folder.clone(),
        config.folder_annotation.clone(),
        config.selector.clone(),
    ));
    let (shutdown_tx, shutdown_rx) = create_shutdown_channel();
    let listener = spawn_signal_listener(shutdown_tx)?;

    let controller = RunModeController::new(config, source, pipeline);
    let result = controller.run(shutdown_rx).await;

    listener.abort();
    let _ = listener.await;
    info!("sidecar stopped");
    result
}
