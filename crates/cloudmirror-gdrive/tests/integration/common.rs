//! Shared fixtures for the Drive v3 API mock

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cloudmirror_gdrive::{DriveClient, GDriveProvider};

pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// Starts one mock server standing in for both Drive hosts
pub async fn setup() -> (MockServer, GDriveProvider) {
    let server = MockServer::start().await;
    let client = DriveClient::with_base_urls("test-token", server.uri(), server.uri());
    (server, GDriveProvider::new(client))
}

/// Builds a file resource JSON body
pub fn file(id: &str, name: &str, mime: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "mimeType": mime,
        "modifiedTime": "2024-03-01T10:00:00Z"
    })
}

/// Mounts a single-page children listing for a parent folder id
pub async fn mount_children(server: &MockServer, parent_id: &str, files: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param(
            "q",
            format!("'{parent_id}' in parents and trashed=false"),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"files": files})))
        .mount(server)
        .await;
}

/// Mounts a find-by-name response for the folder query `prepare_root` runs
pub async fn mount_find_folder(server: &MockServer, parent_id: &str, name: &str, found: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param(
            "q",
            format!(
                "mimeType='{FOLDER_MIME}' and name='{name}' and '{parent_id}' in parents and trashed=false"
            ),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"files": found})))
        .mount(server)
        .await;
}
