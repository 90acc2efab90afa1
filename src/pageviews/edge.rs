// src/pageviews/edge.rs
//
// The page-view edge service: `GET /?path=` answers with a cached count,
// `OPTIONS` answers CORS preflights, and only allow-listed origins get an
// `Access-Control-Allow-Origin` header back.

use async_trait::async_trait;
use axum::{
    extract::{Query, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{
    collections::HashMap,
    io,
    net::SocketAddr,
    path::PathBuf,
    sync::Arc,
    time::Duration,
};
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::error::SourceError;

/// Server-side cache lifetime, also advertised in `Cache-Control`.
pub const CACHE_TTL: Duration = Duration::from_secs(300);

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "https://yourdomain.com",
    "http://localhost:1313",
    "http://localhost:1314",
];

const PREFLIGHT_MAX_AGE: &str = "86400";

/// Backend that knows the total views of a page.
#[async_trait]
pub trait ViewSource: Send + Sync + 'static {
    async fn page_views(&self, path: &str) -> Result<u64, SourceError>;
}

/// Reads a JSON object `{ "/path/": views, ... }` exported from the analytics
/// property. Pages missing from the snapshot have no views yet.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    file: PathBuf,
}

impl SnapshotSource {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        SnapshotSource { file: file.into() }
    }
}

#[async_trait]
impl ViewSource for SnapshotSource {
    async fn page_views(&self, path: &str) -> Result<u64, SourceError> {
        let text = tokio::fs::read_to_string(&self.file).await?;
        let counts: HashMap<String, u64> = serde_json::from_str(&text)?;
        Ok(counts.get(path).copied().unwrap_or(0))
    }
}

/// Response body for a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageViews {
    pub path: String,
    pub views: u64,
    pub updated_at: String,
    pub cached: bool,
}

#[derive(Clone)]
pub struct EdgeState {
    source: Arc<dyn ViewSource>,
    cache: Cache<String, PageViews>,
    allowed_origins: Arc<Vec<String>>,
    max_age: u64,
}

impl EdgeState {
    pub fn new(source: impl ViewSource, allowed_origins: Vec<String>, ttl: Duration) -> Self {
        EdgeState {
            source: Arc::new(source),
            cache: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(ttl)
                .build(),
            allowed_origins: Arc::new(allowed_origins),
            max_age: ttl.as_secs(),
        }
    }

    fn allows(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|o| o == origin)
    }
}

pub fn cache_key(path: &str) -> String {
    format!("pageviews:{path}")
}

pub fn build_router(state: EdgeState) -> Router {
    Router::new()
        .route("/", get(page_views).options(preflight))
        .layer(middleware::from_fn_with_state(state.clone(), cors))
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(bind: SocketAddr, state: EdgeState) -> io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!("page-view service listening on http://{}", listener.local_addr()?);
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}

#[derive(Debug, Deserialize)]
struct ViewsQuery {
    path: Option<String>,
}

async fn page_views(State(state): State<EdgeState>, Query(query): Query<ViewsQuery>) -> Response {
    let Some(path) = query.path.filter(|p| !p.is_empty()) else {
        return json_response(
            StatusCode::BAD_REQUEST,
            &json!({ "error": "Missing path parameter" }),
            state.max_age,
            false,
        );
    };

    let key = cache_key(&path);
    if let Some(hit) = state.cache.get(&key).await {
        debug!(%path, "page-view cache hit");
        let body = PageViews { cached: true, ..hit };
        return json_response(StatusCode::OK, &body, state.max_age, true);
    }

    match state.source.page_views(&path).await {
        Ok(views) => {
            let body = PageViews {
                path,
                views,
                updated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                cached: false,
            };
            state.cache.insert(key, body.clone()).await;
            json_response(StatusCode::OK, &body, state.max_age, false)
        }
        Err(e) => {
            error!(%path, error = %e, "failed to fetch page views");
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({ "error": "Failed to fetch page views", "message": e.to_string() }),
                state.max_age,
                false,
            )
        }
    }
}

async fn preflight() -> Response {
    let mut resp = StatusCode::NO_CONTENT.into_response();
    let headers = resp.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(PREFLIGHT_MAX_AGE),
    );
    resp
}

async fn cors(State(state): State<EdgeState>, req: Request, next: Next) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let mut resp = next.run(req).await;
    if let Some(origin) = origin.filter(|o| state.allows(o)) {
        if let Ok(v) = HeaderValue::from_str(&origin) {
            resp.headers_mut()
                .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, v);
        }
        resp.headers_mut()
            .insert(header::VARY, HeaderValue::from_static("Origin"));
    }
    resp
}

fn json_response<T: Serialize>(status: StatusCode, body: &T, max_age: u64, hit: bool) -> Response {
    let mut resp = (status, Json(body)).into_response();
    if let Ok(v) = HeaderValue::from_str(&format!("public, max-age={max_age}")) {
        resp.headers_mut().insert(header::CACHE_CONTROL, v);
    }
    if hit {
        resp.headers_mut()
            .insert("x-cache", HeaderValue::from_static("HIT"));
    }
    resp
}
