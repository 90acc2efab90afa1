// src/error.rs

use thiserror::Error;

/// Failures while loading heatmap data or building the grid.
#[derive(Debug, Error)]
pub enum HeatmapError {
    /// The data file exists but could not be read.
    #[error("failed to read heatmap data: {0}")]
    Io(#[from] std::io::Error),

    /// The data file is not a valid list of activity records.
    #[error("invalid heatmap data: {0}")]
    Data(#[from] serde_json::Error),

    /// Calendar arithmetic left the representable date range.
    #[error("date out of range: {0} months before {1}")]
    DateOutOfRange(u32, chrono::NaiveDate),
}

/// Failures while loading or saving `config.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Failures of the page-view client.
#[derive(Debug, Error)]
pub enum ViewsError {
    #[error("page-view request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("page-view service returned status {0}")]
    Status(u16),

    #[error("view cache error: {0}")]
    Cache(#[from] rusqlite::Error),

    #[error("could not determine data directory")]
    NoDataDir,

    #[error("view cache io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the analytics backend behind the edge service.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read view snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid view snapshot: {0}")]
    Data(#[from] serde_json::Error),
}
