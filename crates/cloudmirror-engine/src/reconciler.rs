//! Two-phase reconciler
//!
//! Diffs the local and remote relative-path maps by existence and applies
//! the configured per-side actions. Phase 1 walks the local map: matched
//! entries are removed from the remote map (files count as skipped), and
//! local-only entries get the local action. Phase 2 walks the remote
//! leftovers and applies the remote action.
//!
//! Every mutating action checks `dry_run` first: when set, the action is
//! logged with a `[DRY RUN]` prefix and counted, and no adapter call is
//! made. Cancellation is checked before each item; an observed cancellation
//! stops the run but keeps the counters accumulated so far.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use cloudmirror_core::domain::errors::{is_cancelled, SyncError};
use cloudmirror_core::ports::logger::ProgressLog;
use cloudmirror_core::ports::provider::CloudProvider;
use cloudmirror_core::retry::{with_retry, NoRetry, RetryPolicy};
use cloudmirror_core::{
    join_under, LocalAction, PathIdCache, RelPath, RemoteAction, RunConfig, SyncReport,
    SyncStatus, TreeMap,
};

use crate::scanner::scan_local;

/// One sync run: owns its configuration, cache, and counters
///
/// Created fresh per run and consumed by [`execute`](SyncRun::execute);
/// nothing is shared between runs.
pub struct SyncRun {
    provider: Arc<dyn CloudProvider>,
    config: RunConfig,
    log: ProgressLog,
    cancel: CancellationToken,
    retry: Box<dyn RetryPolicy>,
    cache: PathIdCache,
    report: SyncReport,
}

impl SyncRun {
    /// Creates a run with the default single-attempt retry policy
    #[must_use]
    pub fn new(
        provider: Arc<dyn CloudProvider>,
        config: RunConfig,
        log: ProgressLog,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            provider,
            config,
            log,
            cancel,
            retry: Box::new(NoRetry),
            cache: PathIdCache::new(),
            report: SyncReport::new(),
        }
    }

    /// Replaces the retry policy applied to mutating provider calls
    #[must_use]
    pub fn with_retry_policy(mut self, retry: Box<dyn RetryPolicy>) -> Self {
        self.retry = retry;
        self
    }

    /// Runs the sync to completion, cancellation, or fatal error
    ///
    /// Fatal errors (authentication, missing local root, scan failures)
    /// return `Err`. Cancellation is not an error: the report comes back
    /// with [`SyncStatus::Cancelled`] and whatever counters accumulated
    /// before the checkpoint that observed it.
    pub async fn execute(mut self) -> anyhow::Result<SyncReport> {
        let started = Instant::now();
        let outcome = self.run_phases().await;
        self.report.duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(()) => self.report.status = SyncStatus::Completed,
            Err(err) if is_cancelled(&err) => self.report.status = SyncStatus::Cancelled,
            Err(err) => return Err(err),
        }

        self.log.log(&self.report.summary(self.config.dry_run));
        Ok(self.report)
    }

    async fn run_phases(&mut self) -> anyhow::Result<()> {
        self.log
            .log(&format!("Authenticating with {}...", self.provider.name()));
        self.provider
            .authenticate()
            .await
            .map_err(|e| SyncError::AuthenticationFailed(format!("{e:#}")))?;
        self.checkpoint()?;

        if !self.config.local_path.is_dir() {
            return Err(
                SyncError::LocalRootMissing(self.config.local_path.display().to_string()).into(),
            );
        }

        self.log.log("Scanning local and remote files...");
        let local_items = scan_local(&self.config.local_path, &self.cancel).await?;

        // The remote root is only created when this run may upload into it.
        if !self.config.dry_run && self.config.action_local == LocalAction::Upload {
            self.provider
                .prepare_root(&self.config.remote_path, &mut self.cache, true)
                .await?;
        }
        let mut remote_items = self
            .provider
            .scan_remote(&self.config.remote_path, &mut self.cache, &self.cancel)
            .await?;

        debug!(
            local = local_items.len(),
            remote = remote_items.len(),
            "scan complete"
        );
        self.log
            .log(&format!("Found {} local items.", local_items.len()));
        self.log
            .log(&format!("Found {} remote items.", remote_items.len()));

        self.process_local(&local_items, &mut remote_items).await?;
        self.process_remote(&remote_items).await?;
        Ok(())
    }

    /// Phase 1: local entries against the remote map
    async fn process_local(&mut self, local: &TreeMap, remote: &mut TreeMap) -> anyhow::Result<()> {
        let mut deleted_dirs: Vec<RelPath> = Vec::new();

        for (rel, data) in local {
            self.checkpoint()?;
            if under_any(&deleted_dirs, rel) {
                continue;
            }

            if data.is_folder {
                if remote.remove(rel).is_some() {
                    continue;
                }
                match self.config.action_local {
                    LocalAction::Upload => self.create_remote_folder(rel).await?,
                    LocalAction::DeleteLocal => {
                        self.log.log(&format!("DELETING LOCAL FOLDER: {rel}"));
                        if self.delete_local(rel, &data.path, true).await? {
                            deleted_dirs.push(rel.clone());
                        }
                    }
                    LocalAction::IgnoreLocal => self.report.ignored += 1,
                }
                continue;
            }

            if remote.remove(rel).is_some() {
                self.report.skipped += 1;
            } else {
                match self.config.action_local {
                    LocalAction::Upload => {
                        self.log.log(&format!("UPLOADING: {rel}"));
                        self.upload_file(rel, &data.path).await?;
                    }
                    LocalAction::DeleteLocal => {
                        self.log.log(&format!("DELETING LOCAL: {rel}"));
                        self.delete_local(rel, &data.path, false).await?;
                    }
                    LocalAction::IgnoreLocal => {
                        self.log.log(&format!("IGNORING LOCAL: {rel}"));
                        self.report.ignored += 1;
                    }
                }
            }
        }
        Ok(())
    }

    /// Phase 2: remote entries that matched nothing locally
    async fn process_remote(&mut self, remote: &TreeMap) -> anyhow::Result<()> {
        let mut deleted_dirs: Vec<RelPath> = Vec::new();

        for (rel, data) in remote {
            self.checkpoint()?;
            if under_any(&deleted_dirs, rel) {
                continue;
            }

            if data.is_folder {
                // Remote-only folder trees are not recreated locally; only
                // delete_remote acts on them.
                if self.config.action_remote == RemoteAction::DeleteRemote {
                    self.log.log(&format!("DELETING REMOTE FOLDER: {rel}"));
                    if self.delete_remote_item(rel, &data.id).await? {
                        deleted_dirs.push(rel.clone());
                    }
                }
                continue;
            }

            match self.config.action_remote {
                RemoteAction::Download => {
                    self.log.log(&format!("DOWNLOADING: {rel}"));
                    self.download_file(rel, &data.id).await?;
                }
                RemoteAction::DeleteRemote => {
                    self.log.log(&format!("DELETING REMOTE: {rel}"));
                    self.delete_remote_item(rel, &data.id).await?;
                }
                RemoteAction::IgnoreRemote => {
                    self.log.log(&format!("IGNORING REMOTE: {rel}"));
                    self.report.ignored += 1;
                }
            }
        }
        Ok(())
    }

    async fn upload_file(&mut self, rel: &RelPath, local: &Path) -> anyhow::Result<()> {
        if self.config.dry_run {
            self.log.log(&format!("[DRY RUN] UPLOAD: {rel}"));
            self.report.uploaded += 1;
            return Ok(());
        }

        let target = join_under(&self.config.remote_path, rel.as_str());
        let provider = &self.provider;
        let cache = &self.cache;
        let outcome = with_retry(self.retry.as_ref(), || {
            provider.upload_file(local, &target, cache)
        })
        .await;

        match outcome {
            Ok(()) => self.report.uploaded += 1,
            Err(err) if is_cancelled(&err) => return Err(err),
            Err(err) => self.record_failure("uploading", rel, &err),
        }
        Ok(())
    }

    async fn create_remote_folder(&mut self, rel: &RelPath) -> anyhow::Result<()> {
        if self.config.dry_run {
            self.log.log(&format!("[DRY RUN] CREATE FOLDER: {rel}"));
            self.report.uploaded += 1;
            return Ok(());
        }

        let target = join_under(&self.config.remote_path, rel.as_str());
        let provider = &self.provider;
        let cache = &self.cache;
        let outcome =
            with_retry(self.retry.as_ref(), || provider.create_folder(&target, cache)).await;

        match outcome {
            Ok(id) => {
                self.cache.insert(target, id);
                self.report.uploaded += 1;
            }
            Err(err) if is_cancelled(&err) => return Err(err),
            Err(err) => self.record_failure("creating folder", rel, &err),
        }
        Ok(())
    }

    async fn download_file(&mut self, rel: &RelPath, native_id: &str) -> anyhow::Result<()> {
        if self.config.dry_run {
            self.log.log(&format!("[DRY RUN] DOWNLOAD: {rel}"));
            self.report.downloaded += 1;
            return Ok(());
        }

        let dest = self.config.local_path.join(rel.as_str());
        if let Some(parent) = dest.parent() {
            if let Err(err) = tokio::fs::create_dir_all(parent).await {
                self.record_failure("downloading", rel, &anyhow::Error::from(err));
                return Ok(());
            }
        }

        let provider = &self.provider;
        let outcome =
            with_retry(self.retry.as_ref(), || provider.download_file(native_id, &dest)).await;

        match outcome {
            Ok(()) => self.report.downloaded += 1,
            Err(err) if is_cancelled(&err) => return Err(err),
            Err(err) => self.record_failure("downloading", rel, &err),
        }
        Ok(())
    }

    /// Returns true when the entry is gone (deleted now, already absent,
    /// or simulated), so callers can skip its descendants
    async fn delete_local(
        &mut self,
        rel: &RelPath,
        path: &Path,
        is_folder: bool,
    ) -> anyhow::Result<bool> {
        if self.config.dry_run {
            self.log.log(&format!("[DRY RUN] DELETE LOCAL: {rel}"));
            self.report.deleted_local += 1;
            return Ok(true);
        }

        let result = if is_folder {
            tokio::fs::remove_dir_all(path).await
        } else {
            tokio::fs::remove_file(path).await
        };

        match result {
            Ok(()) => {
                self.report.deleted_local += 1;
                Ok(true)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(err) => {
                self.record_failure("deleting local", rel, &anyhow::Error::from(err));
                Ok(false)
            }
        }
    }

    /// Returns true when the remote entry is gone (deleted or simulated)
    async fn delete_remote_item(&mut self, rel: &RelPath, native_id: &str) -> anyhow::Result<bool> {
        if self.config.dry_run {
            self.log.log(&format!("[DRY RUN] DELETE REMOTE: {rel}"));
            self.report.deleted_remote += 1;
            return Ok(true);
        }

        let provider = &self.provider;
        let outcome = with_retry(self.retry.as_ref(), || provider.delete_item(native_id)).await;

        match outcome {
            Ok(()) => {
                self.report.deleted_remote += 1;
                Ok(true)
            }
            Err(err) if is_cancelled(&err) => Err(err),
            Err(err) => {
                self.record_failure("deleting remote", rel, &err);
                Ok(false)
            }
        }
    }

    fn record_failure(&mut self, action: &str, rel: &RelPath, err: &anyhow::Error) {
        warn!(action, path = %rel, error = %err, "item failed, continuing");
        let msg = format!("Error {action} {rel}: {err:#}");
        self.log.log(&msg);
        self.report.errors.push(msg);
    }

    fn checkpoint(&self) -> anyhow::Result<()> {
        if self.cancel.is_cancelled() {
            Err(SyncError::Cancelled.into())
        } else {
            Ok(())
        }
    }
}

/// True when `rel` lies strictly under any of the given folders
fn under_any(deleted: &[RelPath], rel: &RelPath) -> bool {
    deleted.iter().any(|dir| {
        let (d, p) = (dir.as_str(), rel.as_str());
        p.len() > d.len() && p.starts_with(d) && p.as_bytes()[d.len()] == b'/'
    })
}
