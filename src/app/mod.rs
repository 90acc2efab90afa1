// src/app/mod.rs

pub mod config;
pub mod input;
pub mod state;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use tui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use tracing::debug;

use crate::ui::draw::draw;
use state::App;

const TICK: Duration = Duration::from_millis(250);

/// Take over the terminal and browse the calendar until the user quits.
pub fn run(app: &mut App) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, app);

    // ─── Cleanup ───
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    result
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    input::refresh_tooltip(app, terminal.size()?);

    while !app.should_quit {
        terminal.draw(|f| draw(f, app))?;

        if !event::poll(TICK)? {
            continue;
        }
        let screen = terminal.size()?;
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key, screen),
            Event::Mouse(mouse) => input::handle_mouse(app, mouse, screen),
            Event::Resize(width, height) => {
                debug!(width, height, "terminal resized");
                // tooltip placement depends on the terminal size
                if app.interaction.modal().is_none() {
                    input::refresh_tooltip(app, Rect::new(0, 0, width, height));
                }
            }
            _ => {}
        }
    }
    Ok(())
}
