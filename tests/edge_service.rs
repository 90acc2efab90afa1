use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use reqwest::{header, Method, StatusCode};
use serde_json::Value;
use tokio::net::TcpListener;

use post_heatmap::error::SourceError;
use post_heatmap::pageviews::edge::{build_router, EdgeState, SnapshotSource, ViewSource};

const ALLOWED: &str = "http://localhost:1313";

/// Fixed count that remembers how often it was asked.
struct Counting {
    views: u64,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ViewSource for Counting {
    async fn page_views(&self, _path: &str) -> Result<u64, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.views)
    }
}

fn counting(views: u64) -> (Counting, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    (
        Counting {
            views,
            calls: calls.clone(),
        },
        calls,
    )
}

async fn spawn(source: impl ViewSource) -> SocketAddr {
    let state = EdgeState::new(source, vec![ALLOWED.to_string()], Duration::from_secs(300));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });
    addr
}

fn url(addr: SocketAddr, query: &str) -> String {
    format!("http://{addr}/{query}")
}

#[tokio::test]
async fn missing_path_is_a_bad_request() {
    let (source, calls) = counting(7);
    let addr = spawn(source).await;

    for query in ["", "?path="] {
        let resp = reqwest::get(url(addr, query)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "Missing path parameter");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn second_request_is_served_from_cache() {
    let (source, calls) = counting(1234);
    let addr = spawn(source).await;
    let client = reqwest::Client::new();

    let first = client
        .get(url(addr, "?path=/posts/hello/"))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert!(first.headers().get("x-cache").is_none());
    assert_eq!(
        first.headers()[header::CACHE_CONTROL],
        "public, max-age=300"
    );
    let body: Value = first.json().await.unwrap();
    assert_eq!(body["path"], "/posts/hello/");
    assert_eq!(body["views"], 1234);
    assert_eq!(body["cached"], false);
    assert!(body["updatedAt"].as_str().is_some_and(|s| s.ends_with('Z')));

    let second = client
        .get(url(addr, "?path=/posts/hello/"))
        .send()
        .await
        .unwrap();
    assert_eq!(second.headers()["x-cache"], "HIT");
    let body: Value = second.json().await.unwrap();
    assert_eq!(body["views"], 1234);
    assert_eq!(body["cached"], true);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn only_allowed_origins_get_cors_headers() {
    let (source, _) = counting(1);
    let addr = spawn(source).await;
    let client = reqwest::Client::new();

    let allowed = client
        .get(url(addr, "?path=/a/"))
        .header(header::ORIGIN, ALLOWED)
        .send()
        .await
        .unwrap();
    assert_eq!(allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], ALLOWED);
    assert_eq!(allowed.headers()[header::VARY], "Origin");

    let other = client
        .get(url(addr, "?path=/a/"))
        .header(header::ORIGIN, "https://elsewhere.example")
        .send()
        .await
        .unwrap();
    assert_eq!(other.status(), StatusCode::OK);
    assert!(other
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn preflight_and_other_methods() {
    let (source, calls) = counting(1);
    let addr = spawn(source).await;
    let client = reqwest::Client::new();

    let preflight = client
        .request(Method::OPTIONS, url(addr, ""))
        .header(header::ORIGIN, ALLOWED)
        .send()
        .await
        .unwrap();
    assert_eq!(preflight.status(), StatusCode::NO_CONTENT);
    let headers = preflight.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, OPTIONS");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "86400");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ALLOWED);

    let post = client
        .post(url(addr, "?path=/a/"))
        .send()
        .await
        .unwrap();
    assert_eq!(post.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn snapshot_source_counts_and_failures() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("views.json");
    std::fs::write(&good, r#"{ "/posts/hello/": 42 }"#).unwrap();
    let addr = spawn(SnapshotSource::new(&good)).await;

    let body: Value = reqwest::get(url(addr, "?path=/posts/hello/"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["views"], 42);

    // pages the snapshot does not know have no views yet
    let body: Value = reqwest::get(url(addr, "?path=/drafts/new/"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["views"], 0);

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "not json").unwrap();
    let addr = spawn(SnapshotSource::new(&broken)).await;

    let resp = reqwest::get(url(addr, "?path=/posts/hello/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Failed to fetch page views");
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
}
