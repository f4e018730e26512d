//! OneDrive implementation of the `CloudProvider` port
//!
//! Folder ids are resolved lazily: the id cache is consulted first, then
//! the path-based Graph lookup. Uploads address the target by path, so
//! only folder creation needs a parent id.

use std::path::Path;

use anyhow::Result;
use tracing::debug;

use cloudmirror_core::ports::provider::{ChildEntry, CloudProvider};
use cloudmirror_core::PathIdCache;

use crate::client::GraphClient;

/// Native id Graph accepts as an alias for the drive root
const ROOT_ID: &str = "root";

/// OneDrive backend
pub struct OneDriveProvider {
    client: GraphClient,
}

impl OneDriveProvider {
    /// Creates a provider over an authenticated Graph client
    #[must_use]
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    /// Resolves a full remote path to an item id, consulting the cache
    /// before hitting the API
    async fn resolve_folder_id(&self, path: &str, cache: &PathIdCache) -> Result<Option<String>> {
        if path.is_empty() {
            return Ok(Some(ROOT_ID.to_string()));
        }
        if let Some(id) = cache.get(path) {
            return Ok(Some(id.to_string()));
        }
        Ok(self.client.get_item_by_path(path).await?.map(|item| item.id))
    }
}

#[async_trait::async_trait]
impl CloudProvider for OneDriveProvider {
    fn name(&self) -> &'static str {
        "onedrive"
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
            return Ok(Some(ROOT_ID.to_string()));
        }
        if let Some(id) = cache.get(root) {
            return Ok(Some(id.to_string()));
        }

        if let Some(item) = self.client.get_item_by_path(root).await? {
            cache.insert(root, item.id.clone());
            return Ok(Some(item.id));
        }
        if !allow_create {
            return Ok(None);
        }

        // Create the missing folder chain segment by segment.
        let mut parent_id = ROOT_ID.to_string();
        let mut partial = String::new();
        for segment in root.split('/') {
            if !partial.is_empty() {
                partial.push('/');
            }
            partial.push_str(segment);

            let id = match self.resolve_folder_id(&partial, cache).await? {
                Some(id) => id,
                None => {
                    debug!(path = %partial, "creating remote root segment");
                    self.client.create_folder(&parent_id, segment).await?.id
                }
            };
            cache.insert(partial.clone(), id.clone());
            parent_id = id;
        }
        Ok(Some(parent_id))
    }

    async fn list_children(&self, folder_id: &str) -> Result<Vec<ChildEntry>> {
        let items = self.client.list_children(folder_id).await?;
        Ok(items
            .into_iter()
            .map(|item| ChildEntry {
                is_folder: item.is_folder(),
                name: item.name,
                id: item.id,
                mtime: item.last_modified_date_time,
            })
            .collect())
    }

    async fn upload_file(
        &self,
        local: &Path,
        remote_path: &str,
        _cache: &PathIdCache,
    ) -> Result<()> {
        let content = tokio::fs::read(local).await?;
        self.client.upload_content(remote_path, content).await?;
        Ok(())
    }

    async fn create_folder(&self, remote_path: &str, cache: &PathIdCache) -> Result<String> {
        let (parent, name) = match remote_path.rsplit_once('/') {
            Some((parent, name)) => (parent, name),
            None => ("", remote_path),
        };

        let parent_id = self
            .resolve_folder_id(parent, cache)
            .await?
            .ok_or_else(|| anyhow::anyhow!("cannot create {remote_path}: parent not found"))?;

        let item = self.client.create_folder(&parent_id, name).await?;
        Ok(item.id)
    }

    async fn download_file(&self, native_id: &str, dest: &Path) -> Result<()> {
        let content = self.client.download_content(native_id).await?;
        tokio::fs::write(dest, content).await?;
        Ok(())
    }

    async fn delete_item(&self, native_id: &str) -> Result<()> {
        self.client.delete_item(native_id).await
    }
}
