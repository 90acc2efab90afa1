// src/ui/mod.rs

pub mod draw;
pub mod heatmap;
pub mod overlay;
