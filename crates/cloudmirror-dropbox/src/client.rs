//! Dropbox HTTP API v2 client
//!
//! RPC calls POST a JSON body to the api host; content calls POST raw
//! bytes to the content host with the JSON arguments serialized into the
//! `Dropbox-API-Arg` header.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Base URL for RPC endpoints
const API_BASE_URL: &str = "https://api.dropboxapi.com/2";
/// Base URL for content transfer endpoints
const CONTENT_BASE_URL: &str = "https://content.dropboxapi.com/2";

/// One entry as returned by `files/list_folder` and `files/get_metadata`
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    /// Entry kind: "file", "folder", or "deleted"
    #[serde(rename = ".tag")]
    pub tag: String,
    /// Entry name
    pub name: String,
    /// API id ("id:..."), absent on deleted entries
    pub id: Option<String>,
    /// Display path with original casing
    pub path_display: Option<String>,
    /// Client-recorded modification time (files only)
    pub client_modified: Option<DateTime<Utc>>,
}

impl Metadata {
    /// Returns true for folder entries
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.tag == "folder"
    }
}

/// One page of a `files/list_folder` result
#[derive(Debug, Deserialize)]
pub struct ListFolderPage {
    pub entries: Vec<Metadata>,
    pub cursor: String,
    pub has_more: bool,
}

/// Envelope used by `files/create_folder_v2` and `files/delete_v2`
#[derive(Debug, Deserialize)]
pub struct MetadataEnvelope {
    pub metadata: Metadata,
}

/// HTTP client for the Dropbox API v2
pub struct DropboxClient {
    client: Client,
    api_base: String,
    content_base: String,
    access_token: String,
}

impl DropboxClient {
    /// Creates a client with the given access token
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_urls(access_token, API_BASE_URL, CONTENT_BASE_URL)
    }

    /// Creates a client with custom host URLs (useful for testing)
    pub fn with_base_urls(
        access_token: impl Into<String>,
        api_base: impl Into<String>,
        content_base: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            content_base: content_base.into(),
            access_token: access_token.into(),
        }
    }

    /// Issues an RPC call and deserializes the JSON response
    pub async fn rpc<T: DeserializeOwned>(&self, endpoint: &str, body: &Value) -> Result<T> {
        let url = format!("{}{endpoint}", self.api_base);
        let result = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await
            .with_context(|| format!("failed to call {endpoint}"))?
            .error_for_status()
            .with_context(|| format!("{endpoint} returned error status"))?
            .json()
            .await
            .with_context(|| format!("failed to parse {endpoint} response"))?;
        Ok(result)
    }

    /// Verifies the token against `users/get_current_account`
    pub async fn check_credentials(&self) -> Result<()> {
        let _account: Value = self.rpc("/users/get_current_account", &Value::Null).await?;
        Ok(())
    }

    /// Fetches metadata for a path, or `None` when it does not exist
    ///
    /// Dropbox reports a missing path as HTTP 409 with a `path/not_found`
    /// error body.
    pub async fn get_metadata(&self, path: &str) -> Result<Option<Metadata>> {
        let url = format!("{}/files/get_metadata", self.api_base);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({"path": path}))
            .send()
            .await
            .with_context(|| format!("failed to fetch metadata for {path}"))?;

        if response.status() == StatusCode::CONFLICT {
            return Ok(None);
        }
        let metadata = response
            .error_for_status()
            .with_context(|| format!("get_metadata for {path} returned error status"))?
            .json()
            .await
            .context("failed to parse metadata")?;
        Ok(Some(metadata))
    }

    /// Starts a folder listing (`files/list_folder`)
    pub async fn list_folder(&self, path: &str, recursive: bool) -> Result<ListFolderPage> {
        self.rpc(
            "/files/list_folder",
            &serde_json::json!({"path": path, "recursive": recursive}),
        )
        .await
    }

    /// Fetches the next listing page (`files/list_folder/continue`)
    pub async fn list_folder_continue(&self, cursor: &str) -> Result<ListFolderPage> {
        self.rpc(
            "/files/list_folder/continue",
            &serde_json::json!({"cursor": cursor}),
        )
        .await
    }

    /// Creates a folder, returning its metadata
    pub async fn create_folder(&self, path: &str) -> Result<Metadata> {
        let envelope: MetadataEnvelope = self
            .rpc(
                "/files/create_folder_v2",
                &serde_json::json!({"path": path, "autorename": false}),
            )
            .await?;
        Ok(envelope.metadata)
    }

    /// Deletes a file or folder (folders recursively)
    pub async fn delete(&self, path: &str) -> Result<()> {
        let _envelope: MetadataEnvelope = self
            .rpc("/files/delete_v2", &serde_json::json!({"path": path}))
            .await?;
        Ok(())
    }

    /// Uploads file content (`files/upload` on the content host)
    pub async fn upload(&self, path: &str, content: Vec<u8>) -> Result<Metadata> {
        let arg = serde_json::json!({
            "path": path,
            "mode": "overwrite",
            "autorename": false,
            "mute": true
        });
        debug!(path, bytes = content.len(), "uploading to dropbox");

        let metadata = self
            .client
            .post(format!("{}/files/upload", self.content_base))
            .bearer_auth(&self.access_token)
            .header("Dropbox-API-Arg", arg.to_string())
            .header("Content-Type", "application/octet-stream")
            .body(content)
            .send()
            .await
            .with_context(|| format!("failed to upload {path}"))?
            .error_for_status()
            .with_context(|| format!("upload of {path} returned error status"))?
            .json()
            .await
            .context("failed to parse upload response")?;
        Ok(metadata)
    }

    /// Downloads file content (`files/download` on the content host)
    pub async fn download(&self, path: &str) -> Result<Vec<u8>> {
        let arg = serde_json::json!({"path": path});

        let bytes = self
            .client
            .post(format!("{}/files/download", self.content_base))
            .bearer_auth(&self.access_token)
            .header("Dropbox-API-Arg", arg.to_string())
            .send()
            .await
            .with_context(|| format!("failed to download {path}"))?
            .error_for_status()
            .with_context(|| format!("download of {path} returned error status"))?
            .bytes()
            .await
            .context("failed to read download body")?;
        Ok(bytes.to_vec())
    }
}
