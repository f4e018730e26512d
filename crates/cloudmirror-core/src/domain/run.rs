//! Per-run configuration
//!
//! Immutable for the duration of one `execute` call. The remote root is
//! normalized at construction: forward slashes only, no surrounding
//! separators, and the empty string meaning the provider root.

use std::path::PathBuf;

use super::actions::{LocalAction, RemoteAction};

/// Immutable configuration for a single sync run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Absolute local directory to reconcile
    pub local_path: PathBuf,
    /// Provider-relative remote root; empty string = provider root
    pub remote_path: String,
    /// When true, every mutating action is logged and counted but not performed
    pub dry_run: bool,
    /// Policy for items that exist only locally
    pub action_local: LocalAction,
    /// Policy for items that exist only remotely
    pub action_remote: RemoteAction,
}

impl RunConfig {
    /// Creates a run configuration, normalizing the remote root
    #[must_use]
    pub fn new(
        local_path: impl Into<PathBuf>,
        remote_path: impl AsRef<str>,
        dry_run: bool,
        action_local: LocalAction,
        action_remote: RemoteAction,
    ) -> Self {
        Self {
            local_path: local_path.into(),
            remote_path: normalize_remote_root(remote_path.as_ref()),
            dry_run,
            action_local,
            action_remote,
        }
    }
}

/// Normalizes a remote root: `\` -> `/`, strip surrounding separators.
fn normalize_remote_root(root: &str) -> String {
    root.replace('\\', "/").trim_matches('/').to_string()
}
