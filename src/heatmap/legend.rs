// src/heatmap/legend.rs

use super::level::Level;

pub const LOW_LABEL: &str = "Less";
pub const HIGH_LABEL: &str = "More";

/// One legend swatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swatch {
    pub level: Level,
    pub color: &'static str,
    pub title: String,
}

/// Fixed five-swatch legend with "Less"/"More" end labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Legend {
    pub low: &'static str,
    pub swatches: Vec<Swatch>,
    pub high: &'static str,
}

impl Legend {
    pub fn new() -> Self {
        let swatches = Level::all()
            .map(|level| Swatch {
                level,
                color: level.color(),
                title: swatch_title(level),
            })
            .collect();
        Legend {
            low: LOW_LABEL,
            swatches,
            high: HIGH_LABEL,
        }
    }
}

impl Default for Legend {
    fn default() -> Self {
        Self::new()
    }
}

fn swatch_title(level: Level) -> String {
    match level.value() {
        n if level == Level::MAX => format!("{n}+ posts"),
        n => posts_label(u32::from(n)),
    }
}

/// "1 post", "3 posts"; shared by the legend, tooltips and cell titles.
pub fn posts_label(count: u32) -> String {
    match count {
        1 => "1 post".to_string(),
        n => format!("{n} posts"),
    }
}
