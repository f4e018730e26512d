//! File metadata and tree maps
//!
//! A [`TreeMap`] is the flat relative-path index of one side of a sync run.
//! `BTreeMap` ordering matters: iterating in key order guarantees a folder
//! is visited before any of its children, which the upload flow depends on
//! when creating remote folder hierarchies.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use super::relpath::RelPath;

/// One side of a sync run: relative path -> entry metadata.
///
/// The empty path is never a key; the root itself is not an entry.
pub type TreeMap = BTreeMap<RelPath, FileMetadata>;

/// Metadata for one local or remote filesystem entry
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Provider-native identifier; empty for local entries not yet uploaded
    pub id: String,
    /// Absolute local path (local scan) or provider path (remote scan);
    /// used for I/O, never as the diff key
    pub path: PathBuf,
    /// Last-modified timestamp. Captured on both sides but not consulted by
    /// the existence-only diff; kept so a change-detection strategy can be
    /// added without touching the scanners.
    pub mtime: Option<DateTime<Utc>>,
    /// Folders are diffed and acted upon separately from files
    pub is_folder: bool,
}

impl FileMetadata {
    /// Metadata for a locally scanned entry (no provider id yet)
    #[must_use]
    pub fn local(path: PathBuf, is_folder: bool, mtime: Option<DateTime<Utc>>) -> Self {
        Self {
            id: String::new(),
            path,
            mtime,
            is_folder,
        }
    }

    /// Metadata for a remotely listed entry
    #[must_use]
    pub fn remote(
        id: impl Into<String>,
        path: impl Into<PathBuf>,
        is_folder: bool,
        mtime: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            mtime,
            is_folder,
        }
    }
}
