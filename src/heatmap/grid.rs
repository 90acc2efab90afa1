// src/heatmap/grid.rs

use chrono::NaiveDate;

use super::index::{ActivityRecord, ContributionIndex};
use super::legend::Legend;
use super::level::{classify, Level};
use super::range::DateRange;
use super::sink::RenderSink;

/// Rows per column: Sunday through Saturday.
pub const DAYS_PER_WEEK: usize = 7;

/// One generated day. Borrows its record from the index it was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell<'a> {
    pub date: NaiveDate,
    pub week: usize,
    pub weekday: usize,
    pub in_range: bool,
    pub count: u32,
    pub level: Level,
    pub record: Option<&'a ActivityRecord>,
}

impl<'a> Cell<'a> {
    /// Padding cells before the window start never react to the pointer.
    pub fn hoverable(&self) -> bool {
        self.in_range
    }

    /// Only days with at least one post open the post list.
    pub fn clickable(&self) -> bool {
        self.in_range && self.record.is_some_and(|r| !r.titles.is_empty())
    }
}

/// Week-major calendar grid: column = week, row = weekday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<'a> {
    weeks: usize,
    cells: Vec<Cell<'a>>,
}

impl<'a> Grid<'a> {
    pub fn build(range: &DateRange, index: &'a ContributionIndex) -> Self {
        let cells = range
            .dates()
            .enumerate()
            .map(|(i, date)| {
                let in_range = range.contains(date);
                let record = if in_range { index.get(date) } else { None };
                let count = record.map_or(0, |r| r.count);
                Cell {
                    date,
                    week: i / DAYS_PER_WEEK,
                    weekday: i % DAYS_PER_WEEK,
                    in_range,
                    count,
                    level: classify(count),
                    record,
                }
            })
            .collect();

        Grid {
            weeks: range.weeks(),
            cells,
        }
    }

    pub fn weeks(&self) -> usize {
        self.weeks
    }

    /// Cells in chronological order, which is also column-by-column order.
    pub fn cells(&self) -> &[Cell<'a>] {
        &self.cells
    }

    pub fn cell(&self, week: usize, weekday: usize) -> Option<&Cell<'a>> {
        if weekday >= DAYS_PER_WEEK {
            return None;
        }
        self.cells.get(week * DAYS_PER_WEEK + weekday)
    }

    /// Position of the last in-range day, i.e. "today".
    pub fn last_in_range(&self) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .rev()
            .find(|c| c.in_range)
            .map(|c| (c.week, c.weekday))
    }

    pub fn active_days(&self) -> usize {
        self.cells.iter().filter(|c| c.count > 0).count()
    }

    /// Replace whatever the sink holds with this grid and the legend.
    pub fn render_into<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        sink.clear();
        sink.begin_grid(self.weeks);
        for cell in &self.cells {
            sink.cell(cell);
        }
        sink.end_grid();
        sink.legend(&Legend::new());
    }
}
