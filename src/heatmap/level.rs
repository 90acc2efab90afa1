// src/heatmap/level.rs

use std::fmt;

/// Fill colors for levels 0..=4, lightest first.
pub const PALETTE: [&str; 5] = ["#ebedf0", "#c6e48b", "#7bc96f", "#239a3b", "#196127"];

/// Discrete intensity of a day cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Level(u8);

impl Level {
    pub const MAX: Level = Level(4);

    /// All levels in ascending order.
    pub fn all() -> impl Iterator<Item = Level> {
        (0..=Self::MAX.0).map(Level)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Hex color of this level in [`PALETTE`].
    pub fn color(self) -> &'static str {
        PALETTE[self.0 as usize]
    }

    /// RGB triple of [`Level::color`].
    pub fn rgb(self) -> [u8; 3] {
        let hex = &self.color()[1..];
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        [channel(0), channel(2), channel(4)]
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Map a day's post count onto a level: 0, 1, 2, 3, then 4 for anything more.
pub fn classify(count: u32) -> Level {
    match count {
        0 => Level(0),
        1 => Level(1),
        2 => Level(2),
        3 => Level(3),
        _ => Level::MAX,
    }
}
