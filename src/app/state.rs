// /src/app/state.rs
use crate::heatmap::interaction::{Document, InteractionController};
use crate::heatmap::{Calendar, Prepared};
use crate::theme::Theme;

/// Application state: the prepared calendar, the focused cell and the open
/// overlays.
pub struct App {
    pub prepared: Prepared,
    pub months_back: u32,
    /// Focused cell as `(week, weekday)`. Always an in-range cell.
    pub cursor: Option<(usize, usize)>,
    pub interaction: InteractionController,
    pub theme: Theme,
    pub should_quit: bool,
}

impl App {
    /// Start focused on the most recent day of the range.
    pub fn new(prepared: Prepared, months_back: u32, theme: Theme) -> Self {
        let cursor = match &prepared {
            Prepared::Ready(calendar) => calendar.grid().last_in_range(),
            _ => None,
        };
        App {
            prepared,
            months_back,
            cursor,
            interaction: InteractionController::new(Document::new(false)),
            theme,
            should_quit: false,
        }
    }

    pub fn calendar(&self) -> Option<&Calendar> {
        match &self.prepared {
            Prepared::Ready(calendar) => Some(calendar),
            _ => None,
        }
    }
}
