// src/heatmap/interaction.rs
//
// Hover tooltip and click modal for calendar cells. Each is its own small
// state machine; both share the idle state and at most one of each exists.

use chrono::NaiveDate;

use super::grid::Cell;
use super::legend::posts_label;
use super::long_date;

/// Titles listed in a tooltip before collapsing into "and N more...".
pub const TOOLTIP_TITLES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Rect { left, top, width, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Size { width, height }
    }
}

/// Spacing used when positioning a tooltip next to its cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRules {
    /// Gap between the cell and the tooltip.
    pub offset: f64,
    /// Minimum distance kept from the viewport edges.
    pub margin: f64,
}

impl PlacementRules {
    /// Pixel spacing for a browser page.
    pub const PAGE: PlacementRules = PlacementRules { offset: 8.0, margin: 10.0 };
    /// Character-cell spacing for a terminal.
    pub const TERMINAL: PlacementRules = PlacementRules { offset: 0.0, margin: 0.0 };
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    pub left: f64,
    pub top: f64,
    /// Set when there was no room above the cell.
    pub below: bool,
}

/// Center the tooltip above `target`, clamp it horizontally into the viewport
/// and flip it below the target when it would leave the top edge.
pub fn place_tooltip(target: Rect, tooltip: Size, viewport: Size, rules: PlacementRules) -> Placement {
    let mut left = target.left + target.width / 2.0 - tooltip.width / 2.0;
    let mut top = target.top - tooltip.height - rules.offset;
    let mut below = false;

    if left < rules.margin {
        left = rules.margin;
    }
    if left + tooltip.width > viewport.width - rules.margin {
        left = viewport.width - tooltip.width - rules.margin;
    }
    if top < rules.margin {
        top = target.bottom() + rules.offset;
        below = true;
    }

    Placement { left, top, below }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipContent {
    pub date: NaiveDate,
    pub heading: String,
    pub summary: String,
    pub titles: Vec<String>,
    pub more: Option<String>,
}

impl TooltipContent {
    pub fn for_cell(cell: &Cell<'_>) -> Self {
        let titles = cell.record.map(|r| r.titles.as_slice()).unwrap_or(&[]);
        let summary = if cell.count == 0 {
            "No posts".to_string()
        } else {
            posts_label(cell.count)
        };
        let more = (titles.len() > TOOLTIP_TITLES)
            .then(|| format!("and {} more...", titles.len() - TOOLTIP_TITLES));

        TooltipContent {
            date: cell.date,
            heading: long_date(cell.date),
            summary,
            titles: titles
                .iter()
                .take(TOOLTIP_TITLES)
                .map(|t| format!("• {t}"))
                .collect(),
            more,
        }
    }

    /// Every text line in display order.
    pub fn lines(&self) -> Vec<&str> {
        let mut lines = vec![self.heading.as_str(), self.summary.as_str()];
        lines.extend(self.titles.iter().map(String::as_str));
        if let Some(more) = &self.more {
            lines.push(more);
        }
        lines
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub content: TooltipContent,
    pub placement: Placement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostLink {
    pub title: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub date: NaiveDate,
    pub heading: String,
    pub posts: Vec<PostLink>,
}

impl Modal {
    /// `None` for days without any titles.
    pub fn for_cell(cell: &Cell<'_>) -> Option<Self> {
        if !cell.clickable() {
            return None;
        }
        let record = cell.record?;
        Some(Modal {
            date: cell.date,
            heading: format!("Posts on {} ({})", long_date(cell.date), record.count),
            posts: record
                .posts()
                .map(|(title, href)| PostLink {
                    title: title.to_string(),
                    href: href.to_string(),
                })
                .collect(),
        })
    }
}

/// How a modal was dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Button,
    Overlay,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipState {
    Idle,
    Shown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Idle,
    Shown,
}

/// Document-wide state the controller touches: the background scroll lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Document {
    scroll_locked: bool,
}

impl Document {
    pub fn new(scroll_locked: bool) -> Self {
        Document { scroll_locked }
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }
}

/// Owns the single tooltip and the single modal.
#[derive(Debug, Default)]
pub struct InteractionController {
    document: Document,
    tooltip: Option<Tooltip>,
    modal: Option<Modal>,
    /// Scroll state from before the modal opened; `Some` while the lock is held.
    saved_scroll: Option<bool>,
}

impl InteractionController {
    pub fn new(document: Document) -> Self {
        InteractionController {
            document,
            ..Self::default()
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn tooltip_state(&self) -> TooltipState {
        if self.tooltip.is_some() {
            TooltipState::Shown
        } else {
            TooltipState::Idle
        }
    }

    pub fn modal_state(&self) -> ModalState {
        if self.modal.is_some() {
            ModalState::Shown
        } else {
            ModalState::Idle
        }
    }

    /// Overlays currently present (0..=2).
    pub fn overlay_count(&self) -> usize {
        usize::from(self.tooltip.is_some()) + usize::from(self.modal.is_some())
    }

    /// Show the tooltip for `cell`, replacing any previous one. `measure`
    /// reports the rendered size of the content. Padding cells are ignored.
    pub fn pointer_enter<F>(
        &mut self,
        cell: &Cell<'_>,
        target: Rect,
        viewport: Size,
        rules: PlacementRules,
        measure: F,
    ) -> bool
    where
        F: FnOnce(&TooltipContent) -> Size,
    {
        if !cell.hoverable() {
            return false;
        }
        self.tooltip = None;

        let content = TooltipContent::for_cell(cell);
        let size = measure(&content);
        let placement = place_tooltip(target, size, viewport, rules);
        self.tooltip = Some(Tooltip { content, placement });
        true
    }

    pub fn pointer_leave(&mut self) {
        self.tooltip = None;
    }

    /// Open the post list for `cell`. Days without titles are a no-op.
    pub fn click(&mut self, cell: &Cell<'_>) -> bool {
        let Some(modal) = Modal::for_cell(cell) else {
            return false;
        };
        // the previous modal, if any, is dropped here
        self.modal = Some(modal);
        self.lock_scroll();
        true
    }

    pub fn close_modal(&mut self, _reason: CloseReason) {
        self.modal = None;
        self.unlock_scroll();
    }

    /// Escape closes an open modal. Returns whether it did anything.
    pub fn escape(&mut self) -> bool {
        if self.modal.is_none() {
            return false;
        }
        self.close_modal(CloseReason::Escape);
        true
    }

    fn lock_scroll(&mut self) {
        if self.saved_scroll.is_none() {
            self.saved_scroll = Some(self.document.scroll_locked);
        }
        self.document.scroll_locked = true;
    }

    fn unlock_scroll(&mut self) {
        if let Some(previous) = self.saved_scroll.take() {
            self.document.scroll_locked = previous;
        }
    }
}
