// src/ui/heatmap.rs

use chrono::Datelike;
use tui::{
    backend::Backend,
    layout::Rect,
    style::{Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::heatmap::grid::{Cell, Grid, DAYS_PER_WEEK};
use crate::heatmap::legend::Legend;
use crate::theme::Theme;

/// Each “cell” is 2 chars wide + 1 char padding = 3 total columns
pub const CELL_W: u16 = 3;
/// Weekday label gutter.
pub const LABEL_W: u16 = 4;
/// Borders, month row, 7 day rows, spacer and legend.
pub const HEIGHT: u16 = 2 + 1 + DAYS_PER_WEEK as u16 + 1 + 1;

const WEEKDAY_LABELS: [&str; DAYS_PER_WEEK] = ["", "Mon", "", "Wed", "", "Fri", ""];

/// Where each week column lands on screen. Shared by drawing and mouse
/// hit-testing so both agree on what is under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub origin_x: u16,
    pub origin_y: u16,
    pub first_week: usize,
    pub visible_weeks: usize,
}

impl GridLayout {
    /// Fit as many trailing weeks as `inner` allows, scrolling left far
    /// enough to keep `focus_week` visible.
    pub fn compute(inner: Rect, weeks: usize, focus_week: Option<usize>) -> Self {
        let fits = (inner.width.saturating_sub(LABEL_W) / CELL_W) as usize;
        let visible_weeks = weeks.min(fits.max(1));
        let mut first_week = weeks - visible_weeks;
        if let Some(week) = focus_week {
            first_week = first_week.min(week);
        }
        GridLayout {
            origin_x: inner.x + LABEL_W,
            origin_y: inner.y + 1,
            first_week,
            visible_weeks,
        }
    }

    /// Layout of the calendar on a full terminal of size `screen`.
    pub fn for_screen(screen: Rect, weeks: usize, focus_week: Option<usize>) -> Self {
        let area = super::draw::heatmap_area(screen);
        Self::compute(block().inner(area), weeks, focus_week)
    }

    pub fn cell_rect(&self, week: usize, weekday: usize) -> Option<Rect> {
        if week < self.first_week
            || week >= self.first_week + self.visible_weeks
            || weekday >= DAYS_PER_WEEK
        {
            return None;
        }
        let col = (week - self.first_week) as u16;
        Some(Rect::new(
            self.origin_x + col * CELL_W,
            self.origin_y + weekday as u16,
            CELL_W - 1,
            1,
        ))
    }

    /// `(week, weekday)` under the terminal position, ignoring the gaps.
    pub fn hit(&self, x: u16, y: u16) -> Option<(usize, usize)> {
        if x < self.origin_x || y < self.origin_y {
            return None;
        }
        let weekday = (y - self.origin_y) as usize;
        let dx = x - self.origin_x;
        let col = (dx / CELL_W) as usize;
        if weekday >= DAYS_PER_WEEK || dx % CELL_W == CELL_W - 1 || col >= self.visible_weeks {
            return None;
        }
        Some((self.first_week + col, weekday))
    }
}

fn block() -> Block<'static> {
    Block::default().borders(Borders::ALL)
}

/// Renders the 7×N grid inside a bordered block: month labels on top,
/// weekday labels on the left and the legend underneath.
pub fn draw_heatmap<B: Backend>(
    f: &mut Frame<B>,
    area: Rect,
    grid: &Grid<'_>,
    cursor: Option<(usize, usize)>,
    theme: &Theme,
    months_back: u32,
) {
    let block = block()
        .border_style(Style::default().fg(theme.border.to_tui_color()))
        .title(Span::styled(
            format!(" Posts, last {months_back} months "),
            Style::default().fg(theme.title.to_tui_color()),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let layout = GridLayout::compute(inner, grid.weeks(), cursor.map(|(week, _)| week));
    let label_style = Style::default().fg(theme.weekday_label.to_tui_color());

    let mut rows = Vec::with_capacity(DAYS_PER_WEEK + 3);
    rows.push(month_row(grid, &layout, label_style));
    for (weekday, label) in WEEKDAY_LABELS.iter().enumerate() {
        let mut spans = Vec::with_capacity(layout.visible_weeks * 2 + 1);
        spans.push(Span::styled(format!("{:<1$}", label, LABEL_W as usize), label_style));
        for week in layout.first_week..layout.first_week + layout.visible_weeks {
            let Some(cell) = grid.cell(week, weekday) else {
                continue;
            };
            spans.push(cell_span(cell, cursor == Some((week, weekday)), theme));
            spans.push(Span::raw(" "));
        }
        rows.push(Spans::from(spans));
    }
    rows.push(Spans::from(""));
    rows.push(legend_row(theme));

    f.render_widget(Paragraph::new(rows), inner);
}

/// Month abbreviation above the first week of each month, skipped when it
/// would run into the previous label.
fn month_row(grid: &Grid<'_>, layout: &GridLayout, style: Style) -> Spans<'static> {
    let mut row = " ".repeat(LABEL_W as usize);
    for col in 0..layout.visible_weeks {
        let Some(cell) = grid.cell(layout.first_week + col, 0) else {
            continue;
        };
        let at = LABEL_W as usize + col * CELL_W as usize;
        if cell.date.day() > 7 || row.len() > at {
            continue;
        }
        row.push_str(&" ".repeat(at - row.len()));
        row.push_str(&cell.date.format("%b").to_string());
    }
    Spans::from(Span::styled(row, style))
}

fn cell_span(cell: &Cell<'_>, focused: bool, theme: &Theme) -> Span<'static> {
    if !cell.in_range {
        return Span::styled("  ", Style::default().bg(theme.out_of_range.to_tui_color()));
    }
    let style = Style::default().bg(theme.level_color(cell.level));
    if focused {
        Span::styled(
            "[]",
            style
                .fg(theme.cursor.to_tui_color())
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("  ", style)
    }
}

fn legend_row(theme: &Theme) -> Spans<'static> {
    let legend = Legend::new();
    let label = Style::default().fg(theme.stats_label.to_tui_color());

    let mut spans = vec![
        Span::raw(" ".repeat(LABEL_W as usize)),
        Span::styled(legend.low, label),
        Span::raw(" "),
    ];
    for swatch in &legend.swatches {
        spans.push(Span::styled("  ", Style::default().bg(theme.level_color(swatch.level))));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(legend.high, label));
    Spans::from(spans)
}
