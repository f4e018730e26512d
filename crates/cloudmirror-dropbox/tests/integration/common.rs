//! Shared fixtures for the Dropbox API mock

use serde_json::{json, Value};
use wiremock::MockServer;

use cloudmirror_dropbox::{DropboxClient, DropboxProvider};

/// Starts one mock server standing in for both Dropbox hosts
pub async fn setup() -> (MockServer, DropboxProvider) {
    let server = MockServer::start().await;
    let client = DropboxClient::with_base_urls("test-token", server.uri(), server.uri());
    (server, DropboxProvider::new(client))
}

/// Builds a listing entry JSON body
pub fn entry(tag: &str, name: &str, id: &str, path_display: &str) -> Value {
    let mut body = json!({
        ".tag": tag,
        "name": name,
        "id": id,
        "path_display": path_display,
        "path_lower": path_display.to_lowercase()
    });
    if tag == "file" {
        body["client_modified"] = json!("2024-03-01T10:00:00Z");
    }
    body
}
