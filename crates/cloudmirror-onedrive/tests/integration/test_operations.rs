//! Mutating operations against the Graph mock

use serde_json::json;
use wiremock::matchers::{body_bytes, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cloudmirror_core::ports::provider::CloudProvider;
use cloudmirror_core::PathIdCache;

use crate::common;

#[tokio::test]
async fn test_authenticate_succeeds_with_valid_token() {
    let (server, provider) = common::setup().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "user-1",
            "displayName": "Test User"
        })))
        .mount(&server)
        .await;

    provider.authenticate().await.unwrap();
}

#[tokio::test]
async fn test_authenticate_fails_on_401() {
    let (server, provider) = common::setup().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": "InvalidAuthenticationToken", "message": "Token expired"}
        })))
        .mount(&server)
        .await;

    assert!(provider.authenticate().await.is_err());
}

#[tokio::test]
async fn test_upload_puts_file_content_to_path() {
    let (server, provider) = common::setup().await;

    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("notes.txt");
    tokio::fs::write(&local, b"hello onedrive").await.unwrap();

    Mock::given(method("PUT"))
        .and(path("/me/drive/root:/Backups/notes.txt:/content"))
        .and(body_bytes(b"hello onedrive".to_vec()))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(common::item("id-new", "notes.txt", false)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let cache = PathIdCache::new();
    provider
        .upload_file(&local, "Backups/notes.txt", &cache)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_folder_uses_cached_parent_id() {
    let (server, provider) = common::setup().await;

    Mock::given(method("POST"))
        .and(path("/me/drive/items/id-backups/children"))
        .and(body_partial_json(json!({
            "name": "photos",
            "folder": {},
            "@microsoft.graph.conflictBehavior": "replace"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(common::item("id-photos", "photos", true)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut cache = PathIdCache::new();
    cache.insert("Backups", "id-backups");

    let id = provider
        .create_folder("Backups/photos", &cache)
        .await
        .unwrap();
    assert_eq!(id, "id-photos");
}

#[tokio::test]
async fn test_create_top_level_folder_under_root() {
    let (server, provider) = common::setup().await;

    Mock::given(method("POST"))
        .and(path("/me/drive/items/root/children"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(common::item("id-top", "top", true)),
        )
        .mount(&server)
        .await;

    let id = provider.create_folder("top", &PathIdCache::new()).await.unwrap();
    assert_eq!(id, "id-top");
}

#[tokio::test]
async fn test_download_writes_destination_file() {
    let (server, provider) = common::setup().await;

    Mock::given(method("GET"))
        .and(path("/me/drive/items/id-report/content"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"report body".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("report.pdf");
    provider.download_file("id-report", &dest).await.unwrap();

    assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"report body");
}

#[tokio::test]
async fn test_delete_expects_204() {
    let (server, provider) = common::setup().await;

    Mock::given(method("DELETE"))
        .and(path("/me/drive/items/id-old"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    provider.delete_item("id-old").await.unwrap();
}

#[tokio::test]
async fn test_delete_rejects_unexpected_status() {
    let server = MockServer::start().await;
    let client = cloudmirror_onedrive::GraphClient::with_base_url("token", server.uri());
    let provider = cloudmirror_onedrive::OneDriveProvider::new(client);

    Mock::given(method("DELETE"))
        .and(path("/me/drive/items/id-gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "itemNotFound", "message": "Item not found"}
        })))
        .mount(&server)
        .await;

    assert!(provider.delete_item("id-gone").await.is_err());
}
