//! Microsoft Graph API client
//!
//! A typed HTTP client for the Graph drive endpoints CloudMirror needs:
//! path resolution, children listing with pagination, small-file upload,
//! folder creation, download, and delete. Authentication headers and
//! endpoint construction are handled here; the provider layer maps the
//! wire types onto the port contract.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::debug;

/// Base URL for Microsoft Graph API v1.0
const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// One drive item as returned by the Graph API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    /// Item ID
    pub id: String,
    /// Item name
    pub name: String,
    /// Present (possibly empty) when the item is a folder
    pub folder: Option<serde_json::Value>,
    /// Last modification timestamp
    pub last_modified_date_time: Option<DateTime<Utc>>,
}

impl DriveItem {
    /// Returns true when the item facets mark it as a folder
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }
}

/// One page of a children listing
#[derive(Debug, Deserialize)]
struct ChildrenPage {
    value: Vec<DriveItem>,
    #[serde(rename = "@odata.nextLink")]
    next_link: Option<String>,
}

/// HTTP client for Microsoft Graph API calls
///
/// Wraps `reqwest::Client` with authentication headers and base URL
/// construction.
pub struct GraphClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl GraphClient {
    /// Creates a client with the given access token
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_url(access_token, GRAPH_BASE_URL)
    }

    /// Creates a client with a custom base URL (useful for testing)
    pub fn with_base_url(access_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }

    /// Creates an authenticated request builder for the given method and
    /// path relative to the base URL
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, &url)
            .bearer_auth(&self.access_token)
    }

    /// Verifies the token by fetching the authenticated user's profile
    pub async fn check_credentials(&self) -> Result<()> {
        self.request(Method::GET, "/me")
            .send()
            .await
            .context("failed to fetch /me")?
            .error_for_status()
            .context("GET /me returned error status")?;
        Ok(())
    }

    /// Resolves a drive path to its item, or `None` when it does not exist
    ///
    /// Uses `GET /me/drive/root:/{path}`; the empty path addresses the
    /// drive root itself.
    pub async fn get_item_by_path(&self, path: &str) -> Result<Option<DriveItem>> {
        let api_path = if path.is_empty() {
            "/me/drive/root".to_string()
        } else {
            format!("/me/drive/root:/{path}")
        };

        let response = self
            .request(Method::GET, &api_path)
            .send()
            .await
            .with_context(|| format!("failed to resolve path {path}"))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let item = response
            .error_for_status()
            .with_context(|| format!("path resolution for {path} returned error status"))?
            .json()
            .await
            .context("failed to parse drive item")?;
        Ok(Some(item))
    }

    /// Lists all children of an item, following `@odata.nextLink` pages
    pub async fn list_children(&self, item_id: &str) -> Result<Vec<DriveItem>> {
        let mut items = Vec::new();
        let mut next: Option<String> = None;

        loop {
            let builder = match &next {
                Some(url) => self.client.get(url).bearer_auth(&self.access_token),
                None => self.request(
                    Method::GET,
                    &format!("/me/drive/items/{item_id}/children"),
                ),
            };

            let page: ChildrenPage = builder
                .send()
                .await
                .with_context(|| format!("failed to list children of {item_id}"))?
                .error_for_status()
                .with_context(|| format!("children listing for {item_id} returned error status"))?
                .json()
                .await
                .context("failed to parse children page")?;

            items.extend(page.value);
            match page.next_link {
                Some(url) => next = Some(url),
                None => break,
            }
        }

        debug!(item_id, count = items.len(), "listed children");
        Ok(items)
    }

    /// Uploads file content to a drive path
    /// (`PUT /me/drive/root:/{path}:/content`, simple upload)
    pub async fn upload_content(&self, path: &str, content: Vec<u8>) -> Result<DriveItem> {
        let item = self
            .request(Method::PUT, &format!("/me/drive/root:/{path}:/content"))
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
        Ok(item)
    }

    /// Creates a folder under a parent item
    ///
    /// `conflictBehavior: replace` makes re-creating an existing folder a
    /// no-op rather than an error.
    pub async fn create_folder(&self, parent_id: &str, name: &str) -> Result<DriveItem> {
        let body = serde_json::json!({
            "name": name,
            "folder": {},
            "@microsoft.graph.conflictBehavior": "replace"
        });

        let item = self
            .request(
                Method::POST,
                &format!("/me/drive/items/{parent_id}/children"),
            )
            .json(&body)
            .send()
            .await
            .with_context(|| format!("failed to create folder {name}"))?
            .error_for_status()
            .with_context(|| format!("folder creation for {name} returned error status"))?
            .json()
            .await
            .context("failed to parse folder creation response")?;
        Ok(item)
    }

    /// Downloads an item's content by id
    ///
    /// Graph answers with a redirect to the download URL; reqwest follows
    /// it automatically.
    pub async fn download_content(&self, item_id: &str) -> Result<Vec<u8>> {
        let bytes = self
            .request(Method::GET, &format!("/me/drive/items/{item_id}/content"))
            .send()
            .await
            .with_context(|| format!("failed to download item {item_id}"))?
            .error_for_status()
            .with_context(|| format!("download of {item_id} returned error status"))?
            .bytes()
            .await
            .context("failed to read download body")?;
        Ok(bytes.to_vec())
    }

    /// Deletes an item by id (`DELETE /me/drive/items/{id}`, expects 204)
    pub async fn delete_item(&self, item_id: &str) -> Result<()> {
        let response = self
            .request(Method::DELETE, &format!("/me/drive/items/{item_id}"))
            .send()
            .await
            .with_context(|| format!("failed to delete item {item_id}"))?;

        if response.status() != StatusCode::NO_CONTENT {
            anyhow::bail!(
                "delete of {item_id} returned unexpected status {}",
                response.status()
            );
        }
        Ok(())
    }
}
