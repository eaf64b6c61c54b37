//! Resource-to-filesystem pipeline shared by the initial pass and the watch workers.
//!
//! # Design
//! - Selector check, folder resolution, entry filter, then write or remove.
//! - [`SyncPipeline::materialize`] stops at the first filesystem error; it backs the
//!   initial pass, where a partial mirror is not acceptable.
//! - [`SyncPipeline::apply_event`] logs every failure and keeps going so one bad
//!   object cannot stall a watch.
//! - An update removes files for entries the previous state had and the current one
//!   dropped, including everything left behind when the folder annotation changed.
//! - A resource that stops matching the selector is ignored; files it produced
//!   earlier stay on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sidecar_core::{ResourceEvent, ResourceRecord, SelectorConfig};
use sidecar_fsops::{FileSync, FsOpsResult, accepts_entry, resolve_target_folder};
use sidecar_notify::Notifier;
use tracing::{debug, error, info, warn};

use crate::error::{AppError, AppResult};

/// What a single event did to the mirror.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Files created or overwritten.
    pub written: usize,
    /// Files removed (including ones already absent).
    pub removed: usize,
    /// Filesystem operations that failed.
    pub failures: usize,
    /// The event was ignored because the resource did not match the selector.
    pub skipped: bool,
    /// A notification was delivered successfully.
    pub notified: bool,
}

/// Applies resources and events to the mirror folder and fires notifications.
pub struct SyncPipeline {
    files: FileSync,
    notifier: Arc<dyn Notifier>,
    folder: PathBuf,
    folder_annotation: String,
    selector: SelectorConfig,
}

impl SyncPipeline {
    /// Build a pipeline writing under `folder`.
    #[must_use]
    pub fn new(
        files: FileSync,
        notifier: Arc<dyn Notifier>,
        folder: PathBuf,
        folder_annotation: String,
        selector: SelectorConfig,
    ) -> Self {
        Self {
            files,
            notifier,
            folder,
            folder_annotation,
            selector,
        }
    }

    /// Base folder receiving mirrored files.
    #[must_use]
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Write every accepted entry of `record`. Returns the number of files written.
    ///
    /// # Errors
    ///
    /// Returns an error on the first folder resolution or write failure.
    pub fn materialize(&self, record: &ResourceRecord) -> AppResult<usize> {
        if !self.selector.matches(&record.labels) {
            debug!(resource = %record.key, "resource does not match selector; skipped");
            return Ok(0);
        }
        let folder = self
            .target_folder(record)
            .map_err(|err| AppError::fsops("materialize.resolve_folder", err))?;

        let mut written = 0;
        for (entry, content) in accepted_entries(record) {
            self.files
                .write(&folder, entry, content)
                .map_err(|err| AppError::fsops("materialize.write", err))?;
            written += 1;
        }
        debug!(resource = %record.key, written, "resource materialised");
        Ok(written)
    }

    /// Apply one watch event. Failures are logged and counted, never returned.
    pub async fn apply_event(&self, event: &ResourceEvent) -> ApplyReport {
        let record = event.record();
        let mut report = ApplyReport::default();

        if !self.selector.matches(&record.labels) {
            debug!(
                resource = %record.key,
                event = event.label(),
                "resource does not match selector; mirrored files left in place"
            );
            report.skipped = true;
            return report;
        }

        let folder = match self.target_folder(record) {
            Ok(folder) => folder,
            Err(err) => {
                error!(resource = %record.key, error = %err, "cannot resolve target folder");
                report.failures += 1;
                return report;
            }
        };

        match event {
            ResourceEvent::Added(_) | ResourceEvent::Updated { .. } => {
                for (entry, content) in accepted_entries(record) {
                    match self.files.write(&folder, entry, content) {
                        Ok(path) => {
                            info!(resource = %record.key, path = %path.display(), "file written");
                            report.written += 1;
                        }
                        Err(err) => {
                            error!(resource = %record.key, entry, error = %err, "file write failed");
                            report.failures += 1;
                        }
                    }
                }
                if let Some(previous) = event.previous() {
                    self.remove_stale(previous, record, &folder, &mut report);
                }
            }
            ResourceEvent::Deleted(_) => {
                for (entry, _) in accepted_entries(record) {
                    match self.files.remove(&folder, entry) {
                        Ok(path) => {
                            info!(resource = %record.key, path = %path.display(), "file removed");
                            report.removed += 1;
                        }
                        Err(err) => {
                            error!(resource = %record.key, entry, error = %err, "file removal failed");
                            report.failures += 1;
                        }
                    }
                }
            }
        }

        if matches!(event, ResourceEvent::Added(_)) {
            report.notified = self.notify().await;
        }
        report
    }

    /// Fire one notification. Returns whether it was delivered; failures are logged.
    pub async fn notify(&self) -> bool {
        match self.notifier.notify().await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, status = ?err.status(), "notification failed");
                false
            }
        }
    }

    /// Remove files the previous state produced that the current state no longer
    /// covers: dropped entries, or every entry when the target folder moved.
    fn remove_stale(
        &self,
        previous: &ResourceRecord,
        current: &ResourceRecord,
        current_folder: &Path,
        report: &mut ApplyReport,
    ) {
        if !self.selector.matches(&previous.labels) {
            return;
        }
        let Ok(previous_folder) = self.target_folder(previous) else {
            return;
        };
        let same_folder = previous_folder == current_folder;
        for (entry, _) in accepted_entries(previous) {
            if same_folder && current.data.contains_key(entry) {
                continue;
            }
            match self.files.remove(&previous_folder, entry) {
                Ok(path) => {
                    info!(resource = %current.key, path = %path.display(), "stale file removed");
                    report.removed += 1;
                }
                Err(err) => {
                    error!(resource = %current.key, entry, error = %err, "stale file removal failed");
                    report.failures += 1;
                }
            }
        }
    }

    fn target_folder(&self, record: &ResourceRecord) -> FsOpsResult<PathBuf> {
        resolve_target_folder(&self.folder, &self.folder_annotation, &record.annotations)
    }
}

fn accepted_entries(record: &ResourceRecord) -> impl Iterator<Item = (&str, &[u8])> {
    record
        .data
        .iter()
        .filter(|(entry, _)| accepts_entry(entry))
        .map(|(entry, content)| (entry.as_str(), content.as_slice()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use sidecar_core::{ResourceKind, ResourceRecord};
    use sidecar_test_support::RecordingNotifier;
    use sidecar_test_support::fixtures::{DASHBOARD_LABEL, dashboard_config_map};
    use std::fs;
    use tempfile::TempDir;

    const ANNOTATION: &str = "k8s-sidecar-target-directory";

    fn pipeline(root: &Path, notifier: Arc<RecordingNotifier>) -> SyncPipeline {
        SyncPipeline::new(
            FileSync::new(),
            notifier,
            root.to_path_buf(),
            ANNOTATION.to_string(),
            SelectorConfig::new(DASHBOARD_LABEL, Some("1".to_string())),
        )
    }

    #[tokio::test]
    async fn added_event_writes_json_entries_and_notifies() -> Result<()> {
        let temp = TempDir::new()?;
        let notifier = Arc::new(RecordingNotifier::new());
        let sync = pipeline(temp.path(), Arc::clone(&notifier));
        let record = dashboard_config_map("dash", &[("a.json", "1"), ("b.yaml", "2")]);

        let report = sync.apply_event(&ResourceEvent::Added(record)).await;

        assert_eq!(report.written, 1);
        assert!(report.notified);
        assert_eq!(notifier.calls(), 1);
        assert_eq!(fs::read_to_string(temp.path().join("a.json"))?, "1");
        assert!(!temp.path().join("b.yaml").exists());
        Ok(())
    }

    #[tokio::test]
    async fn updated_event_overwrites_without_notifying() -> Result<()> {
        let temp = TempDir::new()?;
        let notifier = Arc::new(RecordingNotifier::new());
        let sync = pipeline(temp.path(), Arc::clone(&notifier));

        sync.apply_event(&ResourceEvent::Updated {
            record: dashboard_config_map("dash", &[("a.json", r#"{"v":2}"#)]),
            previous: None,
        })
        .await;

        assert_eq!(notifier.calls(), 0);
        assert_eq!(
            fs::read_to_string(temp.path().join("a.json"))?,
            r#"{"v":2}"#
        );
        Ok(())
    }

    #[tokio::test]
    async fn deleted_event_removes_files_without_notifying() -> Result<()> {
        let temp = TempDir::new()?;
        let notifier = Arc::new(RecordingNotifier::new());
        let sync = pipeline(temp.path(), Arc::clone(&notifier));
        fs::write(temp.path().join("x.json"), "{}")?;

        let report = sync
            .apply_event(&ResourceEvent::Deleted(dashboard_config_map(
                "dash",
                &[("x.json", "{}"), ("never-written.json", "{}")],
            )))
            .await;

        assert_eq!(report.removed, 2);
        assert_eq!(report.failures, 0);
        assert!(!temp.path().join("x.json").exists());
        assert_eq!(notifier.calls(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn non_matching_resource_leaves_files_in_place() -> Result<()> {
        let temp = TempDir::new()?;
        let notifier = Arc::new(RecordingNotifier::new());
        let sync = pipeline(temp.path(), Arc::clone(&notifier));
        fs::write(temp.path().join("a.json"), "old")?;

        let relabelled = ResourceRecord::new(ResourceKind::ConfigMap, "monitoring", "dash")
            .with_label(DASHBOARD_LABEL, "0")
            .with_entry("a.json", "new");
        let report = sync
            .apply_event(&ResourceEvent::Updated {
                record: relabelled.clone(),
                previous: Some(Box::new(dashboard_config_map("dash", &[("a.json", "old")]))),
            })
            .await;
        assert!(report.skipped);
        let report = sync.apply_event(&ResourceEvent::Deleted(relabelled)).await;
        assert!(report.skipped);

        assert_eq!(fs::read_to_string(temp.path().join("a.json"))?, "old");
        assert_eq!(notifier.calls(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn update_removes_entries_dropped_since_previous_state() -> Result<()> {
        let temp = TempDir::new()?;
        let notifier = Arc::new(RecordingNotifier::new());
        let sync = pipeline(temp.path(), Arc::clone(&notifier));
        let before = dashboard_config_map("dash", &[("a.json", "1"), ("b.json", "2")]);
        sync.apply_event(&ResourceEvent::Added(before.clone())).await;
        assert!(temp.path().join("b.json").exists());

        let report = sync
            .apply_event(&ResourceEvent::Updated {
                record: dashboard_config_map("dash", &[("a.json", "3")]),
                previous: Some(Box::new(before)),
            })
            .await;

        assert_eq!(report.written, 1);
        assert_eq!(report.removed, 1);
        assert_eq!(fs::read_to_string(temp.path().join("a.json"))?, "3");
        assert!(!temp.path().join("b.json").exists());
        assert_eq!(notifier.calls(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_moving_folder_removes_old_copies() -> Result<()> {
        let temp = TempDir::new()?;
        let sync = pipeline(temp.path(), Arc::new(RecordingNotifier::new()));
        let before = dashboard_config_map("dash", &[("a.json", "1")])
            .with_annotation(ANNOTATION, "team-a");
        sync.apply_event(&ResourceEvent::Added(before.clone())).await;

        let after = dashboard_config_map("dash", &[("a.json", "1")])
            .with_annotation(ANNOTATION, "team-b");
        let report = sync
            .apply_event(&ResourceEvent::Updated {
                record: after,
                previous: Some(Box::new(before)),
            })
            .await;

        assert_eq!(report.removed, 1);
        assert!(!temp.path().join("team-a").join("a.json").exists());
        assert!(temp.path().join("team-b").join("a.json").exists());
        Ok(())
    }

    #[tokio::test]
    async fn update_ignores_previous_state_outside_selector() -> Result<()> {
        let temp = TempDir::new()?;
        let sync = pipeline(temp.path(), Arc::new(RecordingNotifier::new()));
        fs::write(temp.path().join("other.json"), "kept")?;
        let unlabelled = ResourceRecord::new(ResourceKind::ConfigMap, "monitoring", "dash")
            .with_entry("other.json", "x");

        let report = sync
            .apply_event(&ResourceEvent::Updated {
                record: dashboard_config_map("dash", &[("a.json", "1")]),
                previous: Some(Box::new(unlabelled)),
            })
            .await;

        assert_eq!(report.removed, 0);
        assert_eq!(fs::read_to_string(temp.path().join("other.json"))?, "kept");
        Ok(())
    }

    #[test]
    fn folder_annotation_selects_subdirectory() -> Result<()> {
        let temp = TempDir::new()?;
        let sync = pipeline(temp.path(), Arc::new(RecordingNotifier::new()));
        let record =
            dashboard_config_map("dash", &[("a.json", "{}")]).with_annotation(ANNOTATION, "team-a");

        assert_eq!(sync.materialize(&record)?, 1);
        assert!(temp.path().join("team-a").join("a.json").exists());
        Ok(())
    }

    #[tokio::test]
    async fn escaping_annotation_is_fatal_for_materialize_only() -> Result<()> {
        let temp = TempDir::new()?;
        let notifier = Arc::new(RecordingNotifier::new());
        let sync = pipeline(temp.path(), Arc::clone(&notifier));
        let record =
            dashboard_config_map("dash", &[("a.json", "{}")]).with_annotation(ANNOTATION, "../up");

        assert!(matches!(
            sync.materialize(&record),
            Err(AppError::FsOps { .. })
        ));

        let report = sync.apply_event(&ResourceEvent::Added(record)).await;
        assert_eq!(report.failures, 1);
        assert_eq!(report.written, 0);
        Ok(())
    }

    #[tokio::test]
    async fn failed_notification_is_reported_not_raised() -> Result<()> {
        let temp = TempDir::new()?;
        let notifier = Arc::new(RecordingNotifier::failing(500));
        let sync = pipeline(temp.path(), Arc::clone(&notifier));

        let report = sync
            .apply_event(&ResourceEvent::Added(dashboard_config_map(
                "dash",
                &[("a.json", "{}")],
            )))
            .await;

        assert!(!report.notified);
        assert_eq!(report.written, 1);
        assert_eq!(notifier.calls(), 1);
        Ok(())
    }
}
