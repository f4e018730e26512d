//! Per-side reconciliation policies
//!
//! What to do with entries that exist on only one side of the diff.
//! Matched entries are never acted on regardless of policy.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::SyncError;

/// Policy for items that exist only locally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalAction {
    /// Transfer the file (or create the folder) on the remote side
    #[default]
    Upload,
    /// Remove the local file or folder (recursively)
    DeleteLocal,
    /// Leave the item untouched
    IgnoreLocal,
}

/// Policy for items that exist only remotely
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteAction {
    /// Transfer the file into the local tree, creating parent directories
    #[default]
    Download,
    /// Remove the remote entry (folders recursively, provider-side)
    DeleteRemote,
    /// Leave the item untouched
    IgnoreRemote,
}

impl Display for LocalAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Upload => "upload",
            Self::DeleteLocal => "delete_local",
            Self::IgnoreLocal => "ignore_local",
        };
        write!(f, "{s}")
    }
}

impl Display for RemoteAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Download => "download",
            Self::DeleteRemote => "delete_remote",
            Self::IgnoreRemote => "ignore_remote",
        };
        write!(f, "{s}")
    }
}

impl FromStr for LocalAction {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upload" => Ok(Self::Upload),
            "delete_local" | "delete-local" => Ok(Self::DeleteLocal),
            "ignore_local" | "ignore-local" | "ignore" => Ok(Self::IgnoreLocal),
            other => Err(SyncError::InvalidPath(format!(
                "unknown local action: {other}"
            ))),
        }
    }
}

impl FromStr for RemoteAction {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "download" => Ok(Self::Download),
            "delete_remote" | "delete-remote" => Ok(Self::DeleteRemote),
            "ignore_remote" | "ignore-remote" | "ignore" => Ok(Self::IgnoreRemote),
            other => Err(SyncError::InvalidPath(format!(
                "unknown remote action: {other}"
            ))),
        }
    }
}
