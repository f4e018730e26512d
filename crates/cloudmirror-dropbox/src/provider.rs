//! Dropbox implementation of the `CloudProvider` port
//!
//! Paths are the primary addressing scheme: the API accepts both
//! `/full/path` strings and `id:` values wherever a path argument is
//! expected, so native ids here are the API ids returned by listings.
//! `scan_remote` is overridden to use the recursive listing instead of the
//! per-folder default.

use std::path::Path;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use cloudmirror_core::domain::errors::SyncError;
use cloudmirror_core::ports::provider::{ChildEntry, CloudProvider};
use cloudmirror_core::{join_under, FileMetadata, PathIdCache, RelPath, TreeMap};

use crate::client::{DropboxClient, Metadata};

/// Dropbox backend
pub struct DropboxProvider {
    client: DropboxClient,
}

impl DropboxProvider {
    /// Creates a provider over an authenticated Dropbox client
    #[must_use]
    pub fn new(client: DropboxClient) -> Self {
        Self { client }
    }

    /// Converts a full remote path to the API form: leading `/`, or the
    /// empty string for the namespace root
    fn api_path(full: &str) -> String {
        if full.is_empty() {
            String::new()
        } else {
            format!("/{full}")
        }
    }

    /// Strips the root prefix from a `path_display` value
    ///
    /// Listing entries carry absolute paths; the relative part starts
    /// after `/{root}/`.
    fn relative_of<'a>(root: &str, path_display: &'a str) -> &'a str {
        let skip = if root.is_empty() { 1 } else { root.len() + 2 };
        path_display.get(skip..).unwrap_or("")
    }

    fn to_child_entry(entry: Metadata) -> ChildEntry {
        ChildEntry {
            is_folder: entry.is_folder(),
            id: entry.id.unwrap_or_default(),
            name: entry.name,
            mtime: entry.client_modified,
        }
    }
}

#[async_trait::async_trait]
impl CloudProvider for DropboxProvider {
    fn name(&self) -> &'static str {
        "dropbox"
    }

    async fn authenticate(&self) -> Result<()> {
        self.client.check_credentials().await
    }

    async fn prepare_root(
        &self,
        root: &str,
        cache: &mut PathIdCache,
        allow_create: bool,
    ) -> Result<Option<String>> {
        if root.is_empty() {
            return Ok(Some(String::new()));
        }
        if let Some(id) = cache.get(root) {
            return Ok(Some(id.to_string()));
        }

        let path = Self::api_path(root);
        if let Some(meta) = self.client.get_metadata(&path).await? {
            if let Some(id) = meta.id {
                cache.insert(root, id.clone());
                return Ok(Some(id));
            }
        }
        if !allow_create {
            return Ok(None);
        }

        // create_folder_v2 creates missing parents implicitly.
        debug!(root, "creating remote root folder");
        let meta = self.client.create_folder(&path).await?;
        let id = meta
            .id
            .ok_or_else(|| anyhow::anyhow!("created folder {root} has no id"))?;
        cache.insert(root, id.clone());
        Ok(Some(id))
    }

    async fn list_children(&self, folder_id: &str) -> Result<Vec<ChildEntry>> {
        let mut entries = Vec::new();
        let mut page = self.client.list_folder(folder_id, false).await?;
        loop {
            entries.extend(page.entries.drain(..).map(Self::to_child_entry));
            if !page.has_more {
                break;
            }
            page = self.client.list_folder_continue(&page.cursor).await?;
        }
        Ok(entries)
    }

    /// Recursive listing in cursor-sized pages; the per-folder default
    /// would issue one call per directory instead
    async fn scan_remote(
        &self,
        root: &str,
        cache: &mut PathIdCache,
        cancel: &CancellationToken,
    ) -> Result<TreeMap> {
        if !root.is_empty() && self.prepare_root(root, cache, false).await?.is_none() {
            return Ok(TreeMap::new());
        }

        let mut items = TreeMap::new();
        let mut page = self
            .client
            .list_folder(&Self::api_path(root), true)
            .await?;

        loop {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled.into());
            }

            for entry in page.entries.drain(..) {
                if entry.tag == "deleted" {
                    continue;
                }
                let Some(path_display) = entry.path_display.as_deref() else {
                    continue;
                };
                // The recursive listing may include the listed folder itself.
                let relative = Self::relative_of(root, path_display);
                if relative.is_empty() {
                    continue;
                }
                let rel = RelPath::new(relative)?;

                let is_folder = entry.is_folder();
                let id = entry.id.unwrap_or_default();
                if is_folder && !id.is_empty() {
                    cache.insert(join_under(root, rel.as_str()), id.clone());
                }
                items.insert(
                    rel.clone(),
                    FileMetadata::remote(id, rel.as_str(), is_folder, entry.client_modified),
                );
            }

            if !page.has_more {
                break;
            }
            page = self.client.list_folder_continue(&page.cursor).await?;
        }

        Ok(items)
    }

    async fn upload_file(
        &self,
        local: &Path,
        remote_path: &str,
        _cache: &PathIdCache,
    ) -> Result<()> {
        let content = tokio::fs::read(local).await?;
        self.client
            .upload(&Self::api_path(remote_path), content)
            .await?;
        Ok(())
    }

    async fn create_folder(&self, remote_path: &str, _cache: &PathIdCache) -> Result<String> {
        let meta = self.client.create_folder(&Self::api_path(remote_path)).await?;
        meta.id
            .ok_or_else(|| anyhow::anyhow!("created folder {remote_path} has no id"))
    }

    async fn download_file(&self, native_id: &str, dest: &Path) -> Result<()> {
        let content = self.client.download(native_id).await?;
        tokio::fs::write(dest, content).await?;
        Ok(())
    }

    async fn delete_item(&self, native_id: &str) -> Result<()> {
        self.client.delete(native_id).await
    }
}
