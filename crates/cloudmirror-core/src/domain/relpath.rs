//! Relative path newtype
//!
//! `RelPath` is the diff key on both sides of a reconciliation: the path of
//! an entry relative to the sync root, always forward-slash separated
//! regardless of host OS, never empty (the root itself is not an entry),
//! and with no leading or trailing separator.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::SyncError;

/// A validated, forward-slash-separated path relative to a sync root
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelPath(String);

impl RelPath {
    /// Creates a `RelPath`, normalizing backslashes and stripping any
    /// leading/trailing separators.
    ///
    /// # Errors
    /// Returns [`SyncError::InvalidPath`] if the normalized path is empty
    /// or contains `.` / `..` components.
    pub fn new(path: impl AsRef<str>) -> Result<Self, SyncError> {
        let normalized = path.as_ref().replace('\\', "/");
        let trimmed = normalized.trim_matches('/');

        if trimmed.is_empty() {
            return Err(SyncError::InvalidPath(
                "relative path must not be empty".to_string(),
            ));
        }
        if trimmed.split('/').any(|c| c.is_empty() || c == "." || c == "..") {
            return Err(SyncError::InvalidPath(path.as_ref().to_string()));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns the path as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Appends a child component, producing `self/child`
    pub fn join(&self, child: &str) -> Result<Self, SyncError> {
        Self::new(format!("{}/{}", self.0, child))
    }

    /// Returns the parent path, or `None` for top-level entries
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0.rsplit_once('/').map(|(p, _)| Self(p.to_string()))
    }

    /// Returns the final component (file or folder name)
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl Display for RelPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RelPath {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Joins a provider-relative root with a relative path, yielding the full
/// remote path with single separators.
///
/// The empty root denotes the provider root, so `join_under("", "a/b.txt")`
/// is `"a/b.txt"` and `join_under("Backups", "a/b.txt")` is
/// `"Backups/a/b.txt"`.
#[must_use]
pub fn join_under(root: &str, rel: &str) -> String {
    if root.is_empty() {
        rel.to_string()
    } else {
        format!("{root}/{rel}")
    }
}
