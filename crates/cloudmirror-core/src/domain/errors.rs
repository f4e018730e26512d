//! Domain error types
//!
//! `SyncError` covers validation failures and the run-level outcomes the
//! reconciler must distinguish. Cancellation is deliberately an error
//! variant: it is raised at the first checkpoint that observes the token
//! and caught exactly once at the top of the run, so it can never be
//! mistaken for either success or a generic failure.

use thiserror::Error;

/// Errors that can occur in domain operations and during a sync run
#[derive(Debug, Error)]
pub enum SyncError {
    /// The cancellation token was observed at a checkpoint
    #[error("synchronization manually cancelled")]
    Cancelled,

    /// Invalid relative path format or content
    #[error("invalid relative path: {0}")]
    InvalidPath(String),

    /// Credential validation against the provider failed (fatal, pre-scan)
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The configured local root does not exist (fatal, pre-scan)
    #[error("local path does not exist: {0}")]
    LocalRootMissing(String),

    /// A filesystem error during the local scan (fatal: a partial local
    /// map would produce an incorrect diff)
    #[error("local scan failed at {path}: {source}")]
    LocalScan {
        /// Path of the entry that could not be read
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Returns true if the given boundary error is (or wraps) a cancellation.
///
/// Adapter and scan errors cross the port boundary as `anyhow::Error`;
/// this is the single place that recovers the `Cancelled` variant.
pub fn is_cancelled(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<SyncError>(), Some(SyncError::Cancelled))
}
