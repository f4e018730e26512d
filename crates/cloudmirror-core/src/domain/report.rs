//! Sync run outcome and counters
//!
//! A run that observed cancellation still returns its report: actions
//! applied before the checkpoint are not rolled back, and the counters
//! reflect exactly what was done.

/// Final status of a sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Both phases ran to completion (per-item failures may still be listed)
    Completed,
    /// The cancellation token was observed mid-run
    Cancelled,
}

/// Summary of one sync run
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Whether the run completed or was cancelled
    pub status: SyncStatus,
    /// Files uploaded and remote folders created
    pub uploaded: u32,
    /// Files downloaded
    pub downloaded: u32,
    /// Local files/folders removed
    pub deleted_local: u32,
    /// Remote entries removed
    pub deleted_remote: u32,
    /// One-sided items left untouched by an ignore policy
    pub ignored: u32,
    /// Files present on both sides (never acted on)
    pub skipped: u32,
    /// Per-item failures; the run continued past each of them
    pub errors: Vec<String>,
    /// Wall-clock duration of the run in milliseconds
    pub duration_ms: u64,
}

impl SyncReport {
    /// Creates an empty, completed report
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: SyncStatus::Completed,
            uploaded: 0,
            downloaded: 0,
            deleted_local: 0,
            deleted_remote: 0,
            ignored: 0,
            skipped: 0,
            errors: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Total number of mutating actions performed (or simulated)
    #[must_use]
    pub fn total_actions(&self) -> u32 {
        self.uploaded + self.downloaded + self.deleted_local + self.deleted_remote
    }

    /// Returns true if the run was cancelled before finishing
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status == SyncStatus::Cancelled
    }

    /// Human-readable one-line summary
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        if self.is_cancelled() {
            return "Synchronization manually cancelled.".to_string();
        }
        let total = self.total_actions();
        if total == 0 && self.ignored == 0 {
            return "No changes needed.".to_string();
        }
        let prefix = if dry_run { "Simulated" } else { "Completed" };
        format!(
            "{prefix} {total} actions. (Up: {}, Down: {}, Del-L: {}, Del-R: {})",
            self.uploaded, self.downloaded, self.deleted_local, self.deleted_remote
        )
    }
}

impl Default for SyncReport {
    fn default() -> Self {
        Self::new()
    }
}
