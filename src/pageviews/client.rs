// src/pageviews/client.rs

use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::cache::ViewCache;
use super::format::{format_view_count, PLACEHOLDER};
use crate::error::ViewsError;

/// Body of a successful page-view response. Only `views` is required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewsResponse {
    pub views: u64,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub cached: bool,
}

/// Where the displayed text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplaySource {
    Fresh,
    Cached,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDisplay {
    pub text: String,
    pub source: DisplaySource,
}

/// Talks to the page-view edge service and falls back to the local cache.
pub struct PageViewClient {
    http: reqwest::Client,
    endpoint: String,
    cache: ViewCache,
}

impl PageViewClient {
    pub fn new(endpoint: impl Into<String>, cache: ViewCache) -> Result<Self, ViewsError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(PageViewClient {
            http,
            endpoint: endpoint.into(),
            cache,
        })
    }

    /// `GET {endpoint}?path=<path>`.
    pub async fn fetch(&self, path: &str) -> Result<ViewsResponse, ViewsError> {
        let resp = self
            .http
            .get(&self.endpoint)
            .query(&[("path", path)])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ViewsError::Status(resp.status().as_u16()));
        }
        Ok(resp.json().await?)
    }

    /// A still-fresh cached count, if there is one.
    pub fn cached(&self, path: &str) -> Option<ViewDisplay> {
        self.cache.get(path, Utc::now()).map(|c| ViewDisplay {
            text: format_view_count(c.views),
            source: DisplaySource::Cached,
        })
    }

    /// Fetch and cache the count; on failure use the cached value or the
    /// placeholder. Never fails.
    pub async fn display(&self, path: &str) -> ViewDisplay {
        let cached = self.cached(path);
        if let Some(c) = &cached {
            debug!(path, text = %c.text, "showing cached view count");
        }

        match self.fetch(path).await {
            Ok(resp) => {
                self.cache.set(path, resp.views, Utc::now());
                ViewDisplay {
                    text: format_view_count(resp.views),
                    source: DisplaySource::Fresh,
                }
            }
            Err(e) => {
                warn!(path, error = %e, "failed to fetch page views");
                cached.unwrap_or_else(|| ViewDisplay {
                    text: PLACEHOLDER.to_string(),
                    source: DisplaySource::Placeholder,
                })
            }
        }
    }
}
