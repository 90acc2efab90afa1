use std::{net::SocketAddr, time::Duration};

use tokio::net::TcpListener;

use post_heatmap::error::ViewsError;
use post_heatmap::pageviews::{
    cache::DEFAULT_TTL,
    edge::{build_router, EdgeState, SnapshotSource},
    format::PLACEHOLDER,
    DisplaySource, PageViewClient, ViewCache,
};

/// Nothing listens on port 1.
const UNREACHABLE: &str = "http://127.0.0.1:1/";

async fn spawn_service(snapshot: &std::path::Path) -> SocketAddr {
    let state = EdgeState::new(
        SnapshotSource::new(snapshot),
        Vec::new(),
        Duration::from_secs(300),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn fresh_counts_are_formatted_and_cached() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("views.json");
    std::fs::write(&snapshot, r#"{ "/posts/hello/": 1500, "/posts/big/": 12345 }"#).unwrap();
    let addr = spawn_service(&snapshot).await;
    let db = dir.path().join("views.db");

    let client = PageViewClient::new(
        format!("http://{addr}/"),
        ViewCache::open(&db, DEFAULT_TTL).unwrap(),
    )
    .unwrap();

    let resp = client.fetch("/posts/hello/").await.unwrap();
    assert_eq!(resp.views, 1500);
    assert_eq!(resp.path.as_deref(), Some("/posts/hello/"));

    let shown = client.display("/posts/big/").await;
    assert_eq!(shown.text, "12k+");
    assert_eq!(shown.source, DisplaySource::Fresh);
    drop(client);

    // the service is gone for this client, the cache still answers
    let offline = PageViewClient::new(UNREACHABLE, ViewCache::open(&db, DEFAULT_TTL).unwrap()).unwrap();
    let shown = offline.display("/posts/big/").await;
    assert_eq!(shown.text, "12k+");
    assert_eq!(shown.source, DisplaySource::Cached);
}

#[tokio::test]
async fn unknown_page_without_service_shows_the_placeholder() {
    let client = PageViewClient::new(UNREACHABLE, ViewCache::in_memory(DEFAULT_TTL).unwrap()).unwrap();
    let shown = client.display("/posts/never-seen/").await;
    assert_eq!(shown.text, PLACEHOLDER);
    assert_eq!(shown.source, DisplaySource::Placeholder);
    assert!(client.cached("/posts/never-seen/").is_none());
}

#[tokio::test]
async fn error_status_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("views.json");
    std::fs::write(&snapshot, "{}").unwrap();
    let addr = spawn_service(&snapshot).await;

    let client = PageViewClient::new(
        format!("http://{addr}/"),
        ViewCache::in_memory(DEFAULT_TTL).unwrap(),
    )
    .unwrap();
    match client.fetch("").await {
        Err(ViewsError::Status(code)) => assert_eq!(code, 400),
        other => panic!("unexpected {other:?}"),
    }
}
