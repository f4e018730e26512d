//! Google Drive v3 API client
//!
//! Metadata calls go to `www.googleapis.com/drive/v3`; uploads go to the
//! separate upload host with `uploadType=multipart`, where file metadata
//! and content travel together in a `multipart/related` body.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::debug;

/// Base URL for metadata operations
const API_BASE_URL: &str = "https://www.googleapis.com/drive/v3";
/// Base URL for content uploads
const UPLOAD_BASE_URL: &str = "https://www.googleapis.com/upload/drive/v3";

/// MIME type marking an entry as a folder
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Boundary for multipart/related upload bodies
const UPLOAD_BOUNDARY: &str = "cloudmirror_upload_boundary";

/// One file resource as returned by the Drive API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    pub mime_type: Option<String>,
    pub modified_time: Option<DateTime<Utc>>,
}

impl DriveFile {
    /// Returns true when the MIME type marks a folder
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.mime_type.as_deref() == Some(FOLDER_MIME_TYPE)
    }
}

/// One page of a files listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileList {
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub files: Vec<DriveFile>,
}

/// HTTP client for Google Drive v3 calls
pub struct DriveClient {
    client: Client,
    api_base: String,
    upload_base: String,
    access_token: String,
}

impl DriveClient {
    /// Creates a client with the given access token
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_urls(access_token, API_BASE_URL, UPLOAD_BASE_URL)
    }

    /// Creates a client with custom host URLs (useful for testing)
    pub fn with_base_urls(
        access_token: impl Into<String>,
        api_base: impl Into<String>,
        upload_base: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            upload_base: upload_base.into(),
            access_token: access_token.into(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.api_base);
        self.client
            .request(method, &url)
            .bearer_auth(&self.access_token)
    }

    /// Verifies the token by fetching account information
    pub async fn check_credentials(&self) -> Result<()> {
        self.request(Method::GET, "/about")
            .query(&[("fields", "user")])
            .send()
            .await
            .context("failed to fetch /about")?
            .error_for_status()
            .context("GET /about returned error status")?;
        Ok(())
    }

    /// Runs a files query, fetching one page
    pub async fn list_files(&self, query: &str, page_token: Option<&str>) -> Result<FileList> {
        let mut params = vec![
            ("q", query),
            ("fields", "nextPageToken,files(id,name,mimeType,modifiedTime)"),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let list = self
            .request(Method::GET, "/files")
            .query(&params)
            .send()
            .await
            .context("failed to list files")?
            .error_for_status()
            .context("files listing returned error status")?
            .json()
            .await
            .context("failed to parse files listing")?;
        Ok(list)
    }

    /// Finds a child entry by name under a parent folder
    pub async fn find_child(
        &self,
        parent_id: &str,
        name: &str,
        folders_only: bool,
    ) -> Result<Option<DriveFile>> {
        let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
        let mut query = format!("name='{escaped}' and '{parent_id}' in parents and trashed=false");
        if folders_only {
            query = format!("mimeType='{FOLDER_MIME_TYPE}' and {query}");
        }

        let list = self.list_files(&query, None).await?;
        Ok(list.files.into_iter().next())
    }

    /// Creates a folder under a parent, returning the new resource
    pub async fn create_folder(&self, parent_id: &str, name: &str) -> Result<DriveFile> {
        let body = serde_json::json!({
            "name": name,
            "mimeType": FOLDER_MIME_TYPE,
            "parents": [parent_id]
        });

        let file = self
            .request(Method::POST, "/files")
            .json(&body)
            .send()
            .await
            .with_context(|| format!("failed to create folder {name}"))?
            .error_for_status()
            .with_context(|| format!("folder creation for {name} returned error status"))?
            .json()
            .await
            .context("failed to parse folder creation response")?;
        Ok(file)
    }

    /// Uploads file content with metadata in one `multipart/related` body
    pub async fn upload_multipart(
        &self,
        parent_id: &str,
        name: &str,
        content: Vec<u8>,
    ) -> Result<DriveFile> {
        let metadata = serde_json::json!({
            "name": name,
            "parents": [parent_id]
        });

        let mut body = Vec::with_capacity(content.len() + 512);
        body.extend_from_slice(
            format!(
                "--{UPLOAD_BOUNDARY}\r\n\
                 Content-Type: application/json; charset=UTF-8\r\n\r\n\
                 {metadata}\r\n\
                 --{UPLOAD_BOUNDARY}\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&content);
        body.extend_from_slice(format!("\r\n--{UPLOAD_BOUNDARY}--").as_bytes());

        debug!(name, parent_id, bytes = content.len(), "uploading to drive");

        let file = self
            .client
            .post(format!("{}/files", self.upload_base))
            .bearer_auth(&self.access_token)
            .query(&[("uploadType", "multipart")])
            .header(
                "Content-Type",
                format!("multipart/related; boundary={UPLOAD_BOUNDARY}"),
            )
            .body(body)
            .send()
            .await
            .with_context(|| format!("failed to upload {name}"))?
            .error_for_status()
            .with_context(|| format!("upload of {name} returned error status"))?
            .json()
            .await
            .context("failed to parse upload response")?;
        Ok(file)
    }

    /// Downloads a file's content (`GET /files/{id}?alt=media`)
    pub async fn download(&self, file_id: &str) -> Result<Vec<u8>> {
        let bytes = self
            .request(Method::GET, &format!("/files/{file_id}"))
            .query(&[("alt", "media")])
            .send()
            .await
            .with_context(|| format!("failed to download file {file_id}"))?
            .error_for_status()
            .with_context(|| format!("download of {file_id} returned error status"))?
            .bytes()
            .await
            .context("failed to read download body")?;
        Ok(bytes.to_vec())
    }

    /// Deletes a file or folder (folders take their contents with them)
    pub async fn delete(&self, file_id: &str) -> Result<()> {
        let response = self
            .request(Method::DELETE, &format!("/files/{file_id}"))
            .send()
            .await
            .with_context(|| format!("failed to delete file {file_id}"))?;

        if response.status() != StatusCode::NO_CONTENT && !response.status().is_success() {
            anyhow::bail!(
                "delete of {file_id} returned unexpected status {}",
                response.status()
            );
        }
        Ok(())
    }
}
