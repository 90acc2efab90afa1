//! Blog post contribution heatmap: a calendar of publishing activity rendered
//! to HTML, plain text or the terminal, plus the page-view counter shown next
//! to each post.

pub mod app;
pub mod error;
pub mod heatmap;
pub mod pageviews;
pub mod theme;
pub mod ui;

pub use error::{ConfigError, HeatmapError, SourceError, ViewsError};
