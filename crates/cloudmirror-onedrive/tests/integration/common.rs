//! Shared fixtures for the Graph API mock

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cloudmirror_onedrive::{GraphClient, OneDriveProvider};

/// Starts a mock Graph server and a provider pointed at it
pub async fn setup() -> (MockServer, OneDriveProvider) {
    let server = MockServer::start().await;
    let client = GraphClient::with_base_url("test-token", server.uri());
    (server, OneDriveProvider::new(client))
}

/// Builds a drive item JSON body
pub fn item(id: &str, name: &str, is_folder: bool) -> Value {
    let mut body = json!({
        "id": id,
        "name": name,
        "lastModifiedDateTime": "2024-03-01T10:00:00Z"
    });
    if is_folder {
        body["folder"] = json!({"childCount": 0});
    }
    body
}

/// Mounts a path resolution response (`GET /me/drive/root:/{path}`)
pub async fn mount_path_resolution(server: &MockServer, drive_path: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/me/drive/root:/{drive_path}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mounts a single-page children listing for an item id
pub async fn mount_children(server: &MockServer, item_id: &str, children: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/me/drive/items/{item_id}/children")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": children})))
        .mount(server)
        .await;
}
