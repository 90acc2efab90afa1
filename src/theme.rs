// src/theme.rs

use serde::{Deserialize, Serialize};
use tui::style::Color;

use crate::heatmap::level::Level;

/// Colors used by the terminal calendar. All fields have defaults and can be
/// overridden in the `[theme]` table of `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Theme {
    // General UI colors
    pub background: ThemeColor,
    pub foreground: ThemeColor,
    pub border: ThemeColor,
    pub title: ThemeColor,
    pub title_accent: ThemeColor,

    // Calendar
    /// Fill for levels 0..=4.
    pub levels: [ThemeColor; 5],
    pub out_of_range: ThemeColor,
    pub cursor: ThemeColor,
    pub weekday_label: ThemeColor,

    // Overlays
    pub tooltip_bg: ThemeColor,
    pub tooltip_fg: ThemeColor,
    pub link: ThemeColor,
    pub stats_label: ThemeColor,

    // Status colors
    pub error: ThemeColor,
    pub info: ThemeColor,
}

/// Represents a color that can be serialized to/from TOML
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ThemeColor {
    /// Named color like "red" or "light_blue", or a hex string like "#7bc96f"
    Named(String),
    /// RGB color as [r, g, b] array
    Rgb([u8; 3]),
    /// Indexed color (0-255)
    Indexed(u8),
}

impl Default for Theme {
    fn default() -> Self {
        let level = |n: u32| ThemeColor::Rgb(crate::heatmap::level::classify(n).rgb());
        Theme {
            background: ThemeColor::Named("reset".to_string()),
            foreground: ThemeColor::Named("white".to_string()),
            border: ThemeColor::Named("white".to_string()),
            title: ThemeColor::Named("white".to_string()),
            title_accent: ThemeColor::Named("light_blue".to_string()),

            levels: [level(0), level(1), level(2), level(3), level(4)],
            out_of_range: ThemeColor::Named("reset".to_string()),
            cursor: ThemeColor::Named("yellow".to_string()),
            weekday_label: ThemeColor::Named("gray".to_string()),

            tooltip_bg: ThemeColor::Rgb([36, 41, 46]),
            tooltip_fg: ThemeColor::Named("white".to_string()),
            link: ThemeColor::Named("light_blue".to_string()),
            stats_label: ThemeColor::Named("gray".to_string()),

            error: ThemeColor::Named("red".to_string()),
            info: ThemeColor::Named("light_blue".to_string()),
        }
    }
}

impl Theme {
    pub fn level_color(&self, level: Level) -> Color {
        self.levels[level.value() as usize].to_tui_color()
    }
}

impl ThemeColor {
    /// Convert ThemeColor to tui::style::Color
    pub fn to_tui_color(&self) -> Color {
        match self {
            ThemeColor::Named(name) => {
                if let Some(rgb) = parse_hex(name) {
                    return Color::Rgb(rgb[0], rgb[1], rgb[2]);
                }
                match name.to_lowercase().as_str() {
                    "reset" => Color::Reset,
                    "black" => Color::Black,
                    "red" => Color::Red,
                    "green" => Color::Green,
                    "yellow" => Color::Yellow,
                    "blue" => Color::Blue,
                    "magenta" => Color::Magenta,
                    "cyan" => Color::Cyan,
                    "gray" | "grey" => Color::Gray,
                    "dark_gray" | "dark_grey" => Color::DarkGray,
                    "light_red" => Color::LightRed,
                    "light_green" => Color::LightGreen,
                    "light_yellow" => Color::LightYellow,
                    "light_blue" => Color::LightBlue,
                    "light_magenta" => Color::LightMagenta,
                    "light_cyan" => Color::LightCyan,
                    "white" => Color::White,
                    _ => Color::White, // fallback
                }
            }
            ThemeColor::Rgb([r, g, b]) => Color::Rgb(*r, *g, *b),
            ThemeColor::Indexed(index) => Color::Indexed(*index),
        }
    }
}

/// `#rrggbb` → `[r, g, b]`
fn parse_hex(s: &str) -> Option<[u8; 3]> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_and_named_colors() {
        assert_eq!(ThemeColor::Named("#7bc96f".into()).to_tui_color(), Color::Rgb(0x7b, 0xc9, 0x6f));
        assert_eq!(ThemeColor::Named("light_blue".into()).to_tui_color(), Color::LightBlue);
        assert_eq!(ThemeColor::Named("#nothex".into()).to_tui_color(), Color::White);
    }

    #[test]
    fn default_levels_follow_the_palette() {
        let theme = Theme::default();
        assert_eq!(theme.level_color(Level::MAX), Color::Rgb(0x19, 0x61, 0x27));
    }
}
