// src/pageviews/cache.rs

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::{fs, path::Path, time::Duration};
use tracing::warn;

use crate::error::ViewsError;

/// Freshness window for a cached count.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedViews {
    pub views: u64,
    pub timestamp_ms: i64,
}

/// Per-path view counts kept in a small SQLite key/value table so they
/// survive restarts.
pub struct ViewCache {
    conn: Connection,
    ttl: Duration,
}

pub fn cache_key(path: &str) -> String {
    format!("view_cache:{path}")
}

impl ViewCache {
    /// Open (or create) `$XDG_DATA_HOME/post-heatmap/views.db`.
    pub fn open_default(ttl: Duration) -> Result<Self, ViewsError> {
        let mut path = dirs::data_dir().ok_or(ViewsError::NoDataDir)?;
        path.push("post-heatmap");
        fs::create_dir_all(&path)?;
        path.push("views.db");
        Self::open(&path, ttl)
    }

    pub fn open(path: &Path, ttl: Duration) -> Result<Self, ViewsError> {
        Self::init(Connection::open(path)?, ttl)
    }

    pub fn in_memory(ttl: Duration) -> Result<Self, ViewsError> {
        Self::init(Connection::open_in_memory()?, ttl)
    }

    fn init(conn: Connection, ttl: Duration) -> Result<Self, ViewsError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS view_cache (
                key          TEXT    PRIMARY KEY,
                views        INTEGER NOT NULL,
                timestamp_ms INTEGER NOT NULL
            );
        "#,
        )?;
        Ok(ViewCache { conn, ttl })
    }

    /// Fresh entry for `path`, if any. Storage errors count as a miss.
    pub fn get(&self, path: &str, now: DateTime<Utc>) -> Option<CachedViews> {
        match self.lookup(path) {
            Ok(Some(entry)) if self.is_fresh(&entry, now) => Some(entry),
            Ok(_) => None,
            Err(e) => {
                warn!(path, error = %e, "failed to read view cache");
                None
            }
        }
    }

    /// Store `views` for `path`. Storage errors are logged and dropped.
    pub fn set(&self, path: &str, views: u64, now: DateTime<Utc>) {
        let result = self.conn.execute(
            "INSERT INTO view_cache (key, views, timestamp_ms) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET views = excluded.views,
                                            timestamp_ms = excluded.timestamp_ms",
            params![cache_key(path), views as i64, now.timestamp_millis()],
        );
        if let Err(e) = result {
            warn!(path, error = %e, "failed to save view cache");
        }
    }

    fn lookup(&self, path: &str) -> rusqlite::Result<Option<CachedViews>> {
        self.conn
            .query_row(
                "SELECT views, timestamp_ms FROM view_cache WHERE key = ?1",
                params![cache_key(path)],
                |r| {
                    Ok(CachedViews {
                        views: r.get::<_, i64>(0)?.max(0) as u64,
                        timestamp_ms: r.get(1)?,
                    })
                },
            )
            .optional()
    }

    fn is_fresh(&self, entry: &CachedViews, now: DateTime<Utc>) -> bool {
        let age_ms = now.timestamp_millis() - entry.timestamp_ms;
        age_ms < self.ttl.as_millis() as i64
    }
}
