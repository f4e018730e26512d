//! Cloud provider port (driven/secondary port)
//!
//! The capability contract every backend adapter implements. The reconciler
//! is written once against this trait; OneDrive, Dropbox, and Google Drive
//! are pure capability implementations (dependency injection, not
//! inheritance).
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because errors at port boundaries are
//!   adapter-specific and don't need domain-level classification. The one
//!   exception that must survive the boundary intact is
//!   [`SyncError::Cancelled`](crate::domain::errors::SyncError), which the
//!   default scan raises and the engine recovers by downcast.
//! - `scan_remote` has a default breadth-first implementation expressed in
//!   terms of `prepare_root` and `list_children`; adapters whose wire
//!   protocol offers a better primitive (Dropbox's recursive
//!   `files/list_folder`) override it wholesale.
//! - Mutating methods read the run's [`PathIdCache`] to resolve parent
//!   folder ids; `create_folder` returns the new id so the caller can
//!   record it for later calls in the same run.

use std::collections::VecDeque;
use std::path::Path;

use tokio_util::sync::CancellationToken;

use crate::domain::cache::PathIdCache;
use crate::domain::errors::SyncError;
use crate::domain::metadata::{FileMetadata, TreeMap};
use crate::domain::relpath::{join_under, RelPath};

/// One child entry returned by a provider's "list children" call
///
/// A port-level DTO: adapters map their wire formats into this shape and
/// the default scan turns it into [`FileMetadata`].
#[derive(Debug, Clone)]
pub struct ChildEntry {
    /// Entry name (file or folder name, no separators)
    pub name: String,
    /// Provider-native identifier
    pub id: String,
    /// Whether the entry is a folder
    pub is_folder: bool,
    /// Last-modified timestamp, where the provider reports one
    pub mtime: Option<chrono::DateTime<chrono::Utc>>,
}

/// Port trait for cloud storage backends
///
/// Mutating calls return `Err` for a failed item; the reconciler logs and
/// counts the failure but continues with the next item (best-effort).
/// Only `authenticate` failures are fatal to a run.
#[async_trait::async_trait]
pub trait CloudProvider: Send + Sync {
    /// Short provider name for logs ("onedrive", "dropbox", "gdrive")
    fn name(&self) -> &'static str;

    /// Validates the bearer credential against the provider
    ///
    /// Called once before any scanning; failure aborts the entire run.
    async fn authenticate(&self) -> anyhow::Result<()>;

    /// Resolves the remote root to a native folder id
    ///
    /// Returns `Ok(None)` when the root does not exist (the remote tree is
    /// then treated as empty). When `allow_create` is true the adapter may
    /// create the missing folder chain, caching each segment's id; the
    /// engine only allows creation for non-dry-run upload flows.
    async fn prepare_root(
        &self,
        root: &str,
        cache: &mut PathIdCache,
        allow_create: bool,
    ) -> anyhow::Result<Option<String>>;

    /// Lists the immediate children of a folder, following pagination
    /// internally until the listing is complete
    async fn list_children(&self, folder_id: &str) -> anyhow::Result<Vec<ChildEntry>>;

    /// Uploads the file at `local` to the full remote path
    async fn upload_file(
        &self,
        local: &Path,
        remote_path: &str,
        cache: &PathIdCache,
    ) -> anyhow::Result<()>;

    /// Creates a folder at the full remote path, returning its native id
    ///
    /// The caller records the returned id in the cache under `remote_path`
    /// so children created later in the run can resolve their parent.
    async fn create_folder(&self, remote_path: &str, cache: &PathIdCache)
        -> anyhow::Result<String>;

    /// Downloads the file with the given native id to `dest`
    async fn download_file(&self, native_id: &str, dest: &Path) -> anyhow::Result<()>;

    /// Deletes the entry with the given native id (folders recursively,
    /// provider-side)
    async fn delete_item(&self, native_id: &str) -> anyhow::Result<()>;

    /// Scans the remote tree under `root` into a relative-path map
    ///
    /// Default implementation: resolve the root id, then breadth-first
    /// traversal over a queue of `(native_id, relative_path)` pairs using
    /// [`list_children`](Self::list_children). Every folder's id is written
    /// into the cache keyed by its root-prefixed full path. Cancellation is
    /// checked once per dequeued folder.
    async fn scan_remote(
        &self,
        root: &str,
        cache: &mut PathIdCache,
        cancel: &CancellationToken,
    ) -> anyhow::Result<TreeMap> {
        let Some(root_id) = self.prepare_root(root, cache, false).await? else {
            return Ok(TreeMap::new());
        };

        let mut items = TreeMap::new();
        let mut queue: VecDeque<(String, Option<RelPath>)> = VecDeque::new();
        queue.push_back((root_id, None));

        while let Some((folder_id, prefix)) = queue.pop_front() {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled.into());
            }

            for child in self.list_children(&folder_id).await? {
                let rel = match &prefix {
                    Some(p) => p.join(&child.name)?,
                    None => RelPath::new(&child.name)?,
                };

                if child.is_folder {
                    cache.insert(join_under(root, rel.as_str()), child.id.clone());
                    queue.push_back((child.id.clone(), Some(rel.clone())));
                }

                items.insert(
                    rel.clone(),
                    FileMetadata::remote(child.id, rel.as_str(), child.is_folder, child.mtime),
                );
            }
        }

        Ok(items)
    }
}
