//! Mutating operations against the Dropbox mock

use serde_json::json;
use wiremock::matchers::{body_bytes, body_json, header_regex, method, path};
use wiremock::{Mock, ResponseTemplate};

use cloudmirror_core::ports::provider::CloudProvider;
use cloudmirror_core::PathIdCache;

use crate::common;

#[tokio::test]
async fn test_authenticate_calls_get_current_account() {
    let (server, provider) = common::setup().await;

    Mock::given(method("POST"))
        .and(path("/users/get_current_account"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "account_id": "dbid:test",
            "name": {"display_name": "Test User"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    provider.authenticate().await.unwrap();
}

#[tokio::test]
async fn test_authenticate_fails_on_401() {
    let (server, provider) = common::setup().await;

    Mock::given(method("POST"))
        .and(path("/users/get_current_account"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error_summary": "invalid_access_token/.."
        })))
        .mount(&server)
        .await;

    assert!(provider.authenticate().await.is_err());
}

#[tokio::test]
async fn test_upload_sends_bytes_with_api_arg_header() {
    let (server, provider) = common::setup().await;

    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("notes.txt");
    tokio::fs::write(&local, b"hello dropbox").await.unwrap();

    Mock::given(method("POST"))
        .and(path("/files/upload"))
        .and(header_regex(
            "Dropbox-API-Arg",
            r#""path":"/Backups/notes\.txt""#,
        ))
        .and(header_regex("Dropbox-API-Arg", r#""mode":"overwrite""#))
        .and(body_bytes(b"hello dropbox".to_vec()))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::entry(
            "file",
            "notes.txt",
            "id:new",
            "/Backups/notes.txt",
        )))
        .expect(1)
        .mount(&server)
        .await;

    provider
        .upload_file(&local, "Backups/notes.txt", &PathIdCache::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_folder_returns_api_id() {
    let (server, provider) = common::setup().await;

    Mock::given(method("POST"))
        .and(path("/files/create_folder_v2"))
        .and(body_json(json!({"path": "/Backups/photos", "autorename": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": common::entry("folder", "photos", "id:photos", "/Backups/photos")
        })))
        .mount(&server)
        .await;

    let id = provider
        .create_folder("Backups/photos", &PathIdCache::new())
        .await
        .unwrap();
    assert_eq!(id, "id:photos");
}

#[tokio::test]
async fn test_download_writes_destination_file() {
    let (server, provider) = common::setup().await;

    Mock::given(method("POST"))
        .and(path("/files/download"))
        .and(header_regex("Dropbox-API-Arg", r#""path":"id:report""#))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"report body".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("report.pdf");
    provider.download_file("id:report", &dest).await.unwrap();

    assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"report body");
}

#[tokio::test]
async fn test_delete_targets_native_id() {
    let (server, provider) = common::setup().await;

    Mock::given(method("POST"))
        .and(path("/files/delete_v2"))
        .and(body_json(json!({"path": "id:old"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": common::entry("file", "old.txt", "id:old", "/old.txt")
        })))
        .expect(1)
        .mount(&server)
        .await;

    provider.delete_item("id:old").await.unwrap();
}

#[tokio::test]
async fn test_delete_failure_surfaces_error() {
    let (server, provider) = common::setup().await;

    Mock::given(method("POST"))
        .and(path("/files/delete_v2"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error_summary": "path_lookup/not_found/.."
        })))
        .mount(&server)
        .await;

    assert!(provider.delete_item("id:gone").await.is_err());
}
