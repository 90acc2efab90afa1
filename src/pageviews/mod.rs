// src/pageviews/mod.rs

//! Page-view counter: display formatting, the durable client cache, the
//! client itself, and the edge service it talks to.

pub mod cache;
pub mod client;
pub mod edge;
pub mod format;

pub use cache::ViewCache;
pub use client::{DisplaySource, PageViewClient, ViewDisplay};
pub use format::format_view_count;
