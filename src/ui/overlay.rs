// src/ui/overlay.rs

use tui::{
    backend::Backend,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::heatmap::interaction::{self, Modal, Tooltip, TooltipContent};
use crate::theme::Theme;

const MIN_MODAL_W: u16 = 30;
const CLOSE_LABEL: &str = "[x]";

/// Size of the bordered tooltip box for `content`, in terminal cells.
pub fn measure(content: &TooltipContent) -> interaction::Size {
    let lines = content.lines();
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 4;
    let height = lines.len() + 2;
    interaction::Size::new(width as f64, height as f64)
}

/// Terminal rect of a cell as seen by tooltip placement.
pub fn target(cell: Rect) -> interaction::Rect {
    interaction::Rect::new(
        f64::from(cell.x),
        f64::from(cell.y),
        f64::from(cell.width),
        f64::from(cell.height),
    )
}

pub fn viewport(screen: Rect) -> interaction::Size {
    interaction::Size::new(f64::from(screen.width), f64::from(screen.height))
}

pub fn tooltip_rect(tooltip: &Tooltip, screen: Rect) -> Rect {
    let size = measure(&tooltip.content);
    let x = (tooltip.placement.left.max(0.0) as u16).min(screen.width);
    let y = (tooltip.placement.top.max(0.0) as u16).min(screen.height);
    Rect::new(
        x,
        y,
        (size.width as u16).min(screen.width - x),
        (size.height as u16).min(screen.height - y),
    )
}

pub fn draw_tooltip<B: Backend>(f: &mut Frame<B>, tooltip: &Tooltip, theme: &Theme) {
    let rect = tooltip_rect(tooltip, f.size());
    let style = Style::default()
        .bg(theme.tooltip_bg.to_tui_color())
        .fg(theme.tooltip_fg.to_tui_color());
    let content = &tooltip.content;

    let mut lines = vec![
        Spans::from(Span::styled(
            content.heading.clone(),
            style.add_modifier(Modifier::BOLD),
        )),
        Spans::from(Span::styled(content.summary.clone(), style)),
    ];
    lines.extend(
        content
            .titles
            .iter()
            .map(|t| Spans::from(Span::styled(t.clone(), style))),
    );
    if let Some(more) = &content.more {
        lines.push(Spans::from(Span::styled(
            more.clone(),
            style.add_modifier(Modifier::ITALIC),
        )));
    }

    f.render_widget(Clear, rect);
    let block = Block::default().borders(Borders::ALL).style(style);
    f.render_widget(Paragraph::new(lines).block(block).style(style), rect);
}

/// Centered popup sized for the post list, like the other popups.
pub fn modal_rect(screen: Rect, modal: &Modal) -> Rect {
    let w = ((u32::from(screen.width) * 7 / 10) as u16)
        .max(MIN_MODAL_W)
        .min(screen.width);
    let body = (modal.posts.len() as u16).saturating_mul(2);
    let h = body
        .saturating_add(4)
        .min(screen.height.saturating_sub(2))
        .max(screen.height.min(5));
    let x = (screen.width.saturating_sub(w)) / 2;
    let y = (screen.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

/// The `[x]` drawn on the modal's top border.
pub fn close_button_rect(modal: Rect) -> Rect {
    let w = CLOSE_LABEL.len() as u16;
    Rect::new(
        modal.x + modal.width.saturating_sub(w + 2),
        modal.y,
        w.min(modal.width),
        1,
    )
}

pub fn draw_modal<B: Backend>(f: &mut Frame<B>, modal: &Modal, theme: &Theme) {
    let rect = modal_rect(f.size(), modal);

    // Clear the popup region so nothing below shows through
    f.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border.to_tui_color()))
        .style(
            Style::default()
                .fg(theme.foreground.to_tui_color())
                .bg(theme.background.to_tui_color()),
        )
        .title(Span::styled(
            format!(" {} ", modal.heading),
            Style::default()
                .fg(theme.title_accent.to_tui_color())
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let link = Style::default()
        .fg(theme.link.to_tui_color())
        .add_modifier(Modifier::UNDERLINED);
    let href = Style::default().fg(theme.stats_label.to_tui_color());
    let mut lines = Vec::with_capacity(modal.posts.len() * 2);
    for post in &modal.posts {
        lines.push(Spans::from(Span::styled(post.title.clone(), link)));
        lines.push(Spans::from(Span::styled(format!("  {}", post.href), href)));
    }
    let list = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(list, inner.inner(&tui::layout::Margin { horizontal: 1, vertical: 1 }));

    let close = Paragraph::new(Span::styled(
        CLOSE_LABEL,
        Style::default().fg(theme.error.to_tui_color()),
    ))
    .alignment(Alignment::Center);
    f.render_widget(close, close_button_rect(rect));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heatmap::interaction::PostLink;
    use chrono::NaiveDate;

    fn modal(posts: usize) -> Modal {
        Modal {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            heading: "Posts on June 1, 2024 (2)".into(),
            posts: (0..posts)
                .map(|i| PostLink {
                    title: format!("Post {i}"),
                    href: format!("/p{i}"),
                })
                .collect(),
        }
    }

    #[test]
    fn modal_is_centered_and_fits() {
        let screen = Rect::new(0, 0, 100, 40);
        let r = modal_rect(screen, &modal(2));
        assert_eq!((r.width, r.height), (70, 8));
        assert_eq!((r.x, r.y), (15, 16));

        let r = modal_rect(screen, &modal(100));
        assert_eq!(r.height, 38);
    }

    #[test]
    fn close_button_sits_on_the_top_border() {
        let r = modal_rect(Rect::new(0, 0, 100, 40), &modal(1));
        let close = close_button_rect(r);
        assert_eq!(close.y, r.y);
        assert!(close.x + close.width < r.x + r.width);
    }

    #[test]
    fn modal_body_uses_the_foreground_color() {
        use crate::theme::ThemeColor;
        use tui::{backend::TestBackend, style::Color, Terminal};

        let theme = Theme {
            foreground: ThemeColor::Rgb([1, 2, 3]),
            ..Theme::default()
        };
        let modal = modal(1);
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| draw_modal(f, &modal, &theme)).unwrap();

        let r = modal_rect(Rect::new(0, 0, 100, 40), &modal);
        let cell = terminal.backend().buffer().get(r.x + 1, r.y + r.height - 2);
        assert_eq!(cell.fg, Color::Rgb(1, 2, 3));
    }

    #[test]
    fn tooltip_box_fits_content() {
        let content = TooltipContent {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            heading: "June 1, 2024".into(),
            summary: "2 posts".into(),
            titles: vec!["• A".into(), "• B".into()],
            more: None,
        };
        let size = measure(&content);
        assert_eq!(size.width, 16.0);
        assert_eq!(size.height, 6.0);
    }
}
