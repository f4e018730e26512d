//! Google Drive implementation of the `CloudProvider` port
//!
//! Every operation that addresses a path first resolves it to a file id:
//! the root chain is walked segment by segment in `prepare_root`, and the
//! ids collected along the way (plus every folder seen while scanning) fill
//! the cache that uploads and folder creation read their parent ids from.

use std::path::Path;

use anyhow::Result;
use tracing::debug;

use cloudmirror_core::ports::provider::{ChildEntry, CloudProvider};
use cloudmirror_core::PathIdCache;

use crate::client::DriveClient;

/// Alias Drive accepts for the My Drive root folder
const ROOT_ID: &str = "root";

/// Google Drive backend
pub struct GDriveProvider {
    client: DriveClient,
}

impl GDriveProvider {
    /// Creates a provider over an authenticated Drive client
    #[must_use]
    pub fn new(client: DriveClient) -> Self {
        Self { client }
    }

    /// Resolves the parent id for a full remote path from the cache
    fn parent_id_of<'a>(remote_path: &str, cache: &'a PathIdCache) -> Result<(&'a str, String)> {
        match remote_path.rsplit_once('/') {
            None => Ok((ROOT_ID, remote_path.to_string())),
            Some((parent, name)) => {
                let id = cache.get(parent).ok_or_else(|| {
                    anyhow::anyhow!("no cached id for parent folder {parent} of {remote_path}")
                })?;
                Ok((id, name.to_string()))
            }
        }
    }
}

#[async_trait::async_trait]
impl CloudProvider for GDriveProvider {
    fn name(&self) -> &'static str {
        "gdrive"
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

        let mut parent_id = ROOT_ID.to_string();
        let mut partial = String::new();
        for segment in root.split('/') {
            if !partial.is_empty() {
                partial.push('/');
            }
            partial.push_str(segment);

            let id = if let Some(id) = cache.get(&partial) {
                id.to_string()
            } else {
                match self.client.find_child(&parent_id, segment, true).await? {
                    Some(folder) => folder.id,
                    None if allow_create => {
                        debug!(path = %partial, "creating remote root segment");
                        self.client.create_folder(&parent_id, segment).await?.id
                    }
                    None => return Ok(None),
                }
            };
            cache.insert(partial.clone(), id.clone());
            parent_id = id;
        }
        Ok(Some(parent_id))
    }

    async fn list_children(&self, folder_id: &str) -> Result<Vec<ChildEntry>> {
        let query = format!("'{folder_id}' in parents and trashed=false");
        let mut entries = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let list = self
                .client
                .list_files(&query, page_token.as_deref())
                .await?;
            entries.extend(list.files.into_iter().map(|file| ChildEntry {
                is_folder: file.is_folder(),
                name: file.name,
                id: file.id,
                mtime: file.modified_time,
            }));
            match list.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(entries)
    }

    async fn upload_file(
        &self,
        local: &Path,
        remote_path: &str,
        cache: &PathIdCache,
    ) -> Result<()> {
        let (parent_id, name) = Self::parent_id_of(remote_path, cache)?;
        let content = tokio::fs::read(local).await?;
        self.client
            .upload_multipart(parent_id, &name, content)
            .await?;
        Ok(())
    }

    async fn create_folder(&self, remote_path: &str, cache: &PathIdCache) -> Result<String> {
        let (parent_id, name) = Self::parent_id_of(remote_path, cache)?;
        let folder = self.client.create_folder(parent_id, &name).await?;
        Ok(folder.id)
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
