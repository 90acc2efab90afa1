// src/heatmap/sink.rs

use chrono::NaiveDate;

use super::grid::{Cell, DAYS_PER_WEEK};
use super::legend::Legend;
use super::level::Level;

pub const EMPTY_MESSAGE: &str = "No posts yet";
pub const ERROR_PREFIX: &str = "Heatmap failed to load";

/// Draw target for a render pass. A pass always starts with `clear`, so a sink
/// reused across passes only ever shows the latest one.
pub trait RenderSink {
    fn clear(&mut self);
    fn begin_grid(&mut self, weeks: usize);
    fn cell(&mut self, cell: &Cell<'_>);
    fn end_grid(&mut self);
    fn legend(&mut self, legend: &Legend);
    fn empty_state(&mut self);
    fn error_state(&mut self, message: &str);
}

/// Glyph for a level, with `' '` for padding days.
pub fn glyph(cell: &Cell<'_>) -> char {
    if !cell.in_range {
        return ' ';
    }
    level_glyph(cell.level)
}

pub fn level_glyph(level: Level) -> char {
    const GLYPHS: [char; 5] = ['.', ':', '+', '#', '@'];
    GLYPHS[level.value() as usize]
}

/// Plain-text sink: seven rows of glyphs followed by the legend line.
#[derive(Debug, Default)]
pub struct TextSink {
    rows: Vec<String>,
    out: String,
}

impl TextSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

impl RenderSink for TextSink {
    fn clear(&mut self) {
        self.rows.clear();
        self.out.clear();
    }

    fn begin_grid(&mut self, weeks: usize) {
        self.rows = vec![String::with_capacity(weeks); DAYS_PER_WEEK];
    }

    fn cell(&mut self, cell: &Cell<'_>) {
        if let Some(row) = self.rows.get_mut(cell.weekday) {
            row.push(glyph(cell));
        }
    }

    fn end_grid(&mut self) {
        for row in self.rows.drain(..) {
            self.out.push_str(row.trim_end());
            self.out.push('\n');
        }
    }

    fn legend(&mut self, legend: &Legend) {
        self.out.push_str(legend.low);
        for swatch in &legend.swatches {
            self.out.push(' ');
            self.out.push(level_glyph(swatch.level));
        }
        self.out.push(' ');
        self.out.push_str(legend.high);
        self.out.push('\n');
    }

    fn empty_state(&mut self) {
        self.out.push_str(EMPTY_MESSAGE);
        self.out.push('\n');
    }

    fn error_state(&mut self, message: &str) {
        self.out.push_str(&format!("{ERROR_PREFIX}: {message}\n"));
    }
}

/// What a [`RecordingSink`] remembers about each cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSnapshot {
    pub date: NaiveDate,
    pub in_range: bool,
    pub count: u32,
    pub level: Level,
    pub hoverable: bool,
    pub clickable: bool,
}

/// State the last render pass left behind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Recorded {
    #[default]
    Blank,
    Grid {
        weeks: usize,
        cells: Vec<CellSnapshot>,
        legend: Option<Legend>,
    },
    Empty,
    Error(String),
}

/// In-memory sink that keeps the emitted cell descriptors.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub state: Recorded,
    pub passes: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[CellSnapshot] {
        match &self.state {
            Recorded::Grid { cells, .. } => cells,
            _ => &[],
        }
    }

    pub fn interactive_cells(&self) -> usize {
        self.cells().iter().filter(|c| c.hoverable).count()
    }
}

impl RenderSink for RecordingSink {
    fn clear(&mut self) {
        self.state = Recorded::Blank;
        self.passes += 1;
    }

    fn begin_grid(&mut self, weeks: usize) {
        self.state = Recorded::Grid {
            weeks,
            cells: Vec::with_capacity(weeks * DAYS_PER_WEEK),
            legend: None,
        };
    }

    fn cell(&mut self, cell: &Cell<'_>) {
        if let Recorded::Grid { cells, .. } = &mut self.state {
            cells.push(CellSnapshot {
                date: cell.date,
                in_range: cell.in_range,
                count: cell.count,
                level: cell.level,
                hoverable: cell.hoverable(),
                clickable: cell.clickable(),
            });
        }
    }

    fn end_grid(&mut self) {}

    fn legend(&mut self, legend: &Legend) {
        if let Recorded::Grid { legend: slot, .. } = &mut self.state {
            *slot = Some(legend.clone());
        }
    }

    fn empty_state(&mut self) {
        self.state = Recorded::Empty;
    }

    fn error_state(&mut self, message: &str) {
        self.state = Recorded::Error(message.to_string());
    }
}
