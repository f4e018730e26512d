//! Recursive tree scanning against the Dropbox mock

use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use cloudmirror_core::ports::provider::CloudProvider;
use cloudmirror_core::{PathIdCache, RelPath};

use crate::common;

#[tokio::test]
async fn test_scan_uses_recursive_listing() {
    let (server, provider) = common::setup().await;

    Mock::given(method("POST"))
        .and(path("/files/get_metadata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::entry(
            "folder", "Backups", "id:root", "/Backups",
        )))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/files/list_folder"))
        .and(body_json(json!({"path": "/Backups", "recursive": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [
                common::entry("folder", "docs", "id:docs", "/Backups/docs"),
                common::entry("file", "plan.txt", "id:plan", "/Backups/docs/plan.txt"),
                common::entry("file", "readme.md", "id:readme", "/Backups/readme.md")
            ],
            "cursor": "cur-end",
            "has_more": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cache = PathIdCache::new();
    let items = provider
        .scan_remote("Backups", &mut cache, &CancellationToken::new())
        .await
        .unwrap();

    let keys: Vec<_> = items.keys().map(RelPath::as_str).collect();
    assert_eq!(keys, vec!["docs", "docs/plan.txt", "readme.md"]);
    assert_eq!(items[&RelPath::new("docs/plan.txt").unwrap()].id, "id:plan");
    assert_eq!(cache.get("Backups/docs"), Some("id:docs"));
}

#[tokio::test]
async fn test_scan_follows_cursor_continuation() {
    let (server, provider) = common::setup().await;

    Mock::given(method("POST"))
        .and(path("/files/list_folder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [common::entry("file", "a.txt", "id:a", "/a.txt")],
            "cursor": "cur-1",
            "has_more": true
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/files/list_folder/continue"))
        .and(body_json(json!({"cursor": "cur-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [common::entry("file", "b.txt", "id:b", "/b.txt")],
            "cursor": "cur-2",
            "has_more": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cache = PathIdCache::new();
    let items = provider
        .scan_remote("", &mut cache, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
    assert!(items.contains_key(&RelPath::new("b.txt").unwrap()));
}

#[tokio::test]
async fn test_scan_tolerates_root_folder_entry_in_listing() {
    let (server, provider) = common::setup().await;

    Mock::given(method("POST"))
        .and(path("/files/get_metadata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::entry(
            "folder", "Backups", "id:root", "/Backups",
        )))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/files/list_folder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [
                common::entry("folder", "Backups", "id:root", "/Backups"),
                common::entry("file", "a.txt", "id:a", "/Backups/a.txt")
            ],
            "cursor": "cur",
            "has_more": false
        })))
        .mount(&server)
        .await;

    let mut cache = PathIdCache::new();
    let items = provider
        .scan_remote("Backups", &mut cache, &CancellationToken::new())
        .await
        .unwrap();

    let keys: Vec<_> = items.keys().map(RelPath::as_str).collect();
    assert_eq!(keys, vec!["a.txt"]);
}

#[tokio::test]
async fn test_scan_skips_deleted_entries() {
    let (server, provider) = common::setup().await;

    Mock::given(method("POST"))
        .and(path("/files/list_folder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [
                {".tag": "deleted", "name": "gone.txt", "path_display": "/gone.txt"},
                common::entry("file", "kept.txt", "id:kept", "/kept.txt")
            ],
            "cursor": "cur",
            "has_more": false
        })))
        .mount(&server)
        .await;

    let mut cache = PathIdCache::new();
    let items = provider
        .scan_remote("", &mut cache, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert!(items.contains_key(&RelPath::new("kept.txt").unwrap()));
}

#[tokio::test]
async fn test_scan_missing_root_yields_empty_tree() {
    let (server, provider) = common::setup().await;

    Mock::given(method("POST"))
        .and(path("/files/get_metadata"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error_summary": "path/not_found/..",
            "error": {".tag": "path", "path": {".tag": "not_found"}}
        })))
        .mount(&server)
        .await;

    let mut cache = PathIdCache::new();
    let items = provider
        .scan_remote("Absent", &mut cache, &CancellationToken::new())
        .await
        .unwrap();

    assert!(items.is_empty());
}

#[tokio::test]
async fn test_prepare_root_creates_missing_folder() {
    let (server, provider) = common::setup().await;

    Mock::given(method("POST"))
        .and(path("/files/get_metadata"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error_summary": "path/not_found/..",
            "error": {".tag": "path", "path": {".tag": "not_found"}}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/files/create_folder_v2"))
        .and(body_json(json!({"path": "/Backups", "autorename": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": common::entry("folder", "Backups", "id:new", "/Backups")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cache = PathIdCache::new();
    let id = provider
        .prepare_root("Backups", &mut cache, true)
        .await
        .unwrap();

    assert_eq!(id.as_deref(), Some("id:new"));
    assert_eq!(cache.get("Backups"), Some("id:new"));
}
