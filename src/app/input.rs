// src/app/input.rs
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tui::layout::Rect;

use crate::app::state::App;
use crate::heatmap::interaction::{CloseReason, PlacementRules};
use crate::heatmap::Prepared;
use crate::ui::heatmap::GridLayout;
use crate::ui::overlay;

/// Handle a key press. `screen` is the current terminal size.
pub fn handle_key(app: &mut App, key: KeyEvent, screen: Rect) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // While the post list is open only its close controls respond.
    if app.interaction.modal().is_some() {
        match key.code {
            KeyCode::Esc => {
                app.interaction.escape();
            }
            KeyCode::Char('x') => app.interaction.close_modal(CloseReason::Button),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Left | KeyCode::Char('h') => move_cursor(app, -1, 0, screen),
        KeyCode::Right | KeyCode::Char('l') => move_cursor(app, 1, 0, screen),
        KeyCode::Up | KeyCode::Char('k') => move_cursor(app, 0, -1, screen),
        KeyCode::Down | KeyCode::Char('j') => move_cursor(app, 0, 1, screen),
        KeyCode::Enter | KeyCode::Char(' ') => activate(app),
        _ => {}
    }
}

/// Pointer movement hovers cells, a left click opens them. With the post
/// list open a click outside it (or on its `[x]`) closes it.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent, screen: Rect) {
    let (x, y) = (mouse.column, mouse.row);

    if let Some(modal) = app.interaction.modal() {
        if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
            let rect = overlay::modal_rect(screen, modal);
            if contains(overlay::close_button_rect(rect), x, y) {
                app.interaction.close_modal(CloseReason::Button);
            } else if !contains(rect, x, y) {
                app.interaction.close_modal(CloseReason::Overlay);
            }
        }
        return;
    }

    let hit = {
        let Prepared::Ready(calendar) = &app.prepared else {
            return;
        };
        let grid = calendar.grid();
        let layout = GridLayout::for_screen(screen, grid.weeks(), app.cursor.map(|(w, _)| w));
        layout
            .hit(x, y)
            .filter(|&(week, weekday)| grid.cell(week, weekday).is_some_and(|c| c.hoverable()))
    };

    match (mouse.kind, hit) {
        (MouseEventKind::Moved, Some(pos)) => {
            app.cursor = Some(pos);
            refresh_tooltip(app, screen);
        }
        (MouseEventKind::Moved, None) => app.interaction.pointer_leave(),
        (MouseEventKind::Down(MouseButton::Left), Some(pos)) => {
            app.cursor = Some(pos);
            refresh_tooltip(app, screen);
            activate(app);
        }
        _ => {}
    }
}

/// Show the tooltip for the focused cell, or hide it when there is none or
/// the cell is scrolled out of view.
pub fn refresh_tooltip(app: &mut App, screen: Rect) {
    let Prepared::Ready(calendar) = &app.prepared else {
        app.interaction.pointer_leave();
        return;
    };
    let Some((week, weekday)) = app.cursor else {
        app.interaction.pointer_leave();
        return;
    };
    let grid = calendar.grid();
    let layout = GridLayout::for_screen(screen, grid.weeks(), Some(week));
    match (grid.cell(week, weekday), layout.cell_rect(week, weekday)) {
        (Some(cell), Some(rect)) => {
            app.interaction.pointer_enter(
                cell,
                overlay::target(rect),
                overlay::viewport(screen),
                PlacementRules::TERMINAL,
                overlay::measure,
            );
        }
        _ => app.interaction.pointer_leave(),
    }
}

/// Move focus by whole weeks (`dx`) or days (`dy`), staying on in-range cells.
fn move_cursor(app: &mut App, dx: isize, dy: isize, screen: Rect) {
    if app.interaction.document().scroll_locked() {
        return;
    }
    let Some((week, weekday)) = app.cursor else {
        return;
    };
    let (Some(week), Some(weekday)) = (week.checked_add_signed(dx), weekday.checked_add_signed(dy)) else {
        return;
    };
    let reachable = app
        .calendar()
        .is_some_and(|c| c.grid().cell(week, weekday).is_some_and(|c| c.hoverable()));
    if reachable {
        app.cursor = Some((week, weekday));
        refresh_tooltip(app, screen);
    }
}

/// Open the post list for the focused day, if it has posts.
fn activate(app: &mut App) {
    let Prepared::Ready(calendar) = &app.prepared else {
        return;
    };
    let Some((week, weekday)) = app.cursor else {
        return;
    };
    let grid = calendar.grid();
    if let Some(cell) = grid.cell(week, weekday) {
        if app.interaction.click(cell) {
            app.interaction.pointer_leave();
        }
    }
}

fn contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}
