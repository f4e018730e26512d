//! Remote tree scanning against the Drive mock

use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use cloudmirror_core::ports::provider::CloudProvider;
use cloudmirror_core::{PathIdCache, RelPath};

use crate::common;

#[tokio::test]
async fn test_scan_walks_the_id_graph() {
    let (server, provider) = common::setup().await;

    common::mount_find_folder(
        &server,
        "root",
        "Backups",
        vec![common::file("bk", "Backups", common::FOLDER_MIME)],
    )
    .await;
    common::mount_children(
        &server,
        "bk",
        vec![
            common::file("id-docs", "docs", common::FOLDER_MIME),
            common::file("id-readme", "readme.md", "text/markdown"),
        ],
    )
    .await;
    common::mount_children(
        &server,
        "id-docs",
        vec![common::file("id-plan", "plan.txt", "text/plain")],
    )
    .await;

    let mut cache = PathIdCache::new();
    let items = provider
        .scan_remote("Backups", &mut cache, &CancellationToken::new())
        .await
        .unwrap();

    let keys: Vec<_> = items.keys().map(RelPath::as_str).collect();
    assert_eq!(keys, vec!["docs", "docs/plan.txt", "readme.md"]);
    assert!(items[&RelPath::new("docs").unwrap()].is_folder);
    assert_eq!(cache.get("Backups"), Some("bk"));
    assert_eq!(cache.get("Backups/docs"), Some("id-docs"));
}

#[tokio::test]
async fn test_scan_follows_page_tokens() {
    let (server, provider) = common::setup().await;

    let query = "'root' in parents and trashed=false";
    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param("q", query))
        .and(query_param("pageToken", "tok-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [common::file("id-b", "b.txt", "text/plain")]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param("q", query))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nextPageToken": "tok-2",
            "files": [common::file("id-a", "a.txt", "text/plain")]
        })))
        .mount(&server)
        .await;

    let mut cache = PathIdCache::new();
    let items = provider
        .scan_remote("", &mut cache, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
    assert!(items.contains_key(&RelPath::new("a.txt").unwrap()));
    assert!(items.contains_key(&RelPath::new("b.txt").unwrap()));
}

#[tokio::test]
async fn test_scan_missing_root_yields_empty_tree() {
    let (server, provider) = common::setup().await;

    common::mount_find_folder(&server, "root", "Absent", vec![]).await;

    let mut cache = PathIdCache::new();
    let items = provider
        .scan_remote("Absent", &mut cache, &CancellationToken::new())
        .await
        .unwrap();

    assert!(items.is_empty());
}

#[tokio::test]
async fn test_prepare_root_creates_missing_chain() {
    let (server, provider) = common::setup().await;

    common::mount_find_folder(
        &server,
        "root",
        "A",
        vec![common::file("id-a", "A", common::FOLDER_MIME)],
    )
    .await;
    common::mount_find_folder(&server, "id-a", "B", vec![]).await;

    Mock::given(method("POST"))
        .and(path("/files"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::file("id-b", "B", common::FOLDER_MIME)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut cache = PathIdCache::new();
    let root_id = provider.prepare_root("A/B", &mut cache, true).await.unwrap();

    assert_eq!(root_id.as_deref(), Some("id-b"));
    assert_eq!(cache.get("A"), Some("id-a"));
    assert_eq!(cache.get("A/B"), Some("id-b"));
}
