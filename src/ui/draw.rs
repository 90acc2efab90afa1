use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::state::App;
use crate::heatmap::sink::{EMPTY_MESSAGE, ERROR_PREFIX};
use crate::heatmap::{long_date, Calendar, Prepared};
use crate::ui::{heatmap, overlay};

const NO_DATA_MESSAGE: &str = "No heatmap data found. Set [heatmap] data_path or pass --data.";

/// Header, calendar, free space and the key-hint footer.
fn rows(size: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(heatmap::HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(size)
}

/// Outer rect of the calendar block on a terminal of size `size`.
pub fn heatmap_area(size: Rect) -> Rect {
    rows(size)[1]
}

/// Main drawing function.
pub fn draw<B: Backend>(f: &mut Frame<B>, app: &App) {
    let size = f.size();
    let rows = rows(size);

    f.render_widget(
        Block::default().style(
            Style::default()
                .fg(app.theme.foreground.to_tui_color())
                .bg(app.theme.background.to_tui_color()),
        ),
        size,
    );

    match &app.prepared {
        Prepared::Ready(calendar) => {
            draw_header(f, rows[0], app, calendar);
            let grid = calendar.grid();
            heatmap::draw_heatmap(f, rows[1], &grid, app.cursor, &app.theme, app.months_back);
        }
        Prepared::Empty => draw_message(f, rows[0], EMPTY_MESSAGE.to_string(), app, false),
        Prepared::Absent => draw_message(f, rows[0], NO_DATA_MESSAGE.to_string(), app, false),
        Prepared::Failed(msg) => draw_message(f, rows[0], format!("{ERROR_PREFIX}: {msg}"), app, true),
    }
    draw_footer(f, rows[3], app);

    if let Some(tooltip) = app.interaction.tooltip() {
        overlay::draw_tooltip(f, tooltip, &app.theme);
    }
    if let Some(modal) = app.interaction.modal() {
        overlay::draw_modal(f, modal, &app.theme);
    }
}

fn draw_header<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App, calendar: &Calendar) {
    let grid = calendar.grid();
    let posts: u32 = grid
        .cells()
        .iter()
        .filter(|c| c.in_range)
        .map(|c| c.count)
        .sum();
    let range = calendar.range();

    let label = Style::default().fg(app.theme.stats_label.to_tui_color());
    let value = Style::default()
        .fg(app.theme.title_accent.to_tui_color())
        .add_modifier(Modifier::BOLD);
    let line = Spans::from(vec![
        Span::styled("Posts ", label),
        Span::styled(posts.to_string(), value),
        Span::styled("   Active days ", label),
        Span::styled(grid.active_days().to_string(), value),
        Span::styled("   From ", label),
        Span::styled(long_date(range.start().date()), value),
        Span::styled(" to ", label),
        Span::styled(long_date(range.end().date()), value),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border.to_tui_color()))
        .title(Span::styled(
            " post-heatmap ",
            Style::default().fg(app.theme.title.to_tui_color()),
        ));
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_message<B: Backend>(f: &mut Frame<B>, area: Rect, text: String, app: &App, error: bool) {
    let color = if error { &app.theme.error } else { &app.theme.info };
    let para = Paragraph::new(Span::styled(text, Style::default().fg(color.to_tui_color())))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border.to_tui_color())),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}

fn draw_footer<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App) {
    let hints: &[(&str, &str)] = if app.interaction.modal().is_some() {
        &[("x", "close"), ("Esc", "close"), ("click outside", "close")]
    } else if app.calendar().is_some() {
        &[("←↓↑→/hjkl", "move"), ("Enter", "open day"), ("q", "quit")]
    } else {
        &[("q", "quit")]
    };

    let key = Style::default().fg(app.theme.title_accent.to_tui_color());
    let desc = Style::default().fg(app.theme.stats_label.to_tui_color());
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (k, d) in hints {
        spans.push(Span::styled(format!(" {k} "), key));
        spans.push(Span::styled(format!("{d}  "), desc));
    }
    f.render_widget(Paragraph::new(Spans::from(spans)), area);
}
