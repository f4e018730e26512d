//! Local tree scanner
//!
//! Walks the local root recursively and produces the relative-path map the
//! reconciler diffs against the remote tree. The root itself is not an
//! entry; every path below it is keyed by its `/`-separated relative path.
//! Filesystem errors abort the scan, since a partial map would produce an
//! incorrect diff.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use cloudmirror_core::domain::errors::SyncError;
use cloudmirror_core::{FileMetadata, RelPath, TreeMap};

/// Scans the directory tree under `root` into a relative-path map
pub async fn scan_local(
    root: impl Into<PathBuf>,
    cancel: &CancellationToken,
) -> anyhow::Result<TreeMap> {
    let mut items = TreeMap::new();
    walk(root.into(), None, &mut items, cancel).await?;
    Ok(items)
}

fn io_error(path: &std::path::Path, source: std::io::Error) -> SyncError {
    SyncError::LocalScan {
        path: path.display().to_string(),
        source,
    }
}

fn walk<'a>(
    dir: PathBuf,
    prefix: Option<RelPath>,
    items: &'a mut TreeMap,
    cancel: &'a CancellationToken,
) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
    Box::pin(async move {
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| io_error(&dir, e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error(&dir, e))?
        {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled.into());
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let rel = match &prefix {
                Some(p) => p.join(&name)?,
                None => RelPath::new(&name)?,
            };

            let path = entry.path();
            let meta = entry.metadata().await.map_err(|e| io_error(&path, e))?;
            let mtime = meta.modified().ok().map(DateTime::<Utc>::from);

            if meta.is_dir() {
                items.insert(rel.clone(), FileMetadata::local(path.clone(), true, mtime));
                walk(path, Some(rel), items, cancel).await?;
            } else {
                items.insert(rel, FileMetadata::local(path, false, mtime));
            }
        }

        Ok(())
    })
}
