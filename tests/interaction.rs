use chrono::NaiveDate;

use post_heatmap::heatmap::{
    grid::Cell,
    index::ActivityRecord,
    interaction::{
        CloseReason, Document, InteractionController, ModalState, PlacementRules, Rect, Size,
        TooltipState,
    },
    Calendar,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn record(date: NaiveDate, titles: &[&str]) -> ActivityRecord {
    ActivityRecord {
        date,
        count: titles.len().max(1) as u32,
        titles: titles.iter().map(|t| t.to_string()).collect(),
        urls: titles.iter().map(|t| format!("/{t}")).collect(),
    }
}

fn calendar() -> Calendar {
    Calendar::new(
        vec![
            record(day(2024, 6, 1), &["a", "b"]),
            record(day(2024, 6, 3), &["c", "d", "e", "f", "g"]),
            // counted but untitled
            record(day(2024, 6, 5), &[]),
        ],
        12,
        day(2024, 6, 15).and_hms_opt(9, 30, 0).unwrap(),
    )
    .unwrap()
}

fn find<'g, 'a>(cells: &'g [Cell<'a>], date: NaiveDate) -> &'g Cell<'a> {
    cells.iter().find(|c| c.date == date).unwrap()
}

fn hover(ctl: &mut InteractionController, cell: &Cell<'_>) -> bool {
    ctl.pointer_enter(
        cell,
        Rect::new(400.0, 300.0, 12.0, 12.0),
        Size::new(1280.0, 800.0),
        PlacementRules::PAGE,
        |_| Size::new(180.0, 90.0),
    )
}

#[test]
fn at_most_one_tooltip_and_one_modal() {
    let calendar = calendar();
    let grid = calendar.grid();
    let mut ctl = InteractionController::new(Document::new(false));

    assert!(hover(&mut ctl, find(grid.cells(), day(2024, 6, 1))));
    assert!(hover(&mut ctl, find(grid.cells(), day(2024, 6, 3))));
    assert_eq!(ctl.tooltip().unwrap().content.date, day(2024, 6, 3));

    assert!(ctl.click(find(grid.cells(), day(2024, 6, 1))));
    assert!(ctl.click(find(grid.cells(), day(2024, 6, 3))));
    assert_eq!(ctl.modal().unwrap().date, day(2024, 6, 3));
    assert_eq!(ctl.overlay_count(), 2);
    assert_eq!(ctl.tooltip_state(), TooltipState::Shown);
    assert_eq!(ctl.modal_state(), ModalState::Shown);

    ctl.pointer_leave();
    assert_eq!(ctl.tooltip_state(), TooltipState::Idle);
    assert_eq!(ctl.overlay_count(), 1);
}

#[test]
fn tooltip_lists_three_titles_then_a_count() {
    let calendar = calendar();
    let grid = calendar.grid();
    let mut ctl = InteractionController::new(Document::new(false));

    hover(&mut ctl, find(grid.cells(), day(2024, 6, 3)));
    let content = &ctl.tooltip().unwrap().content;
    assert_eq!(content.heading, "June 3, 2024");
    assert_eq!(content.summary, "5 posts");
    assert_eq!(content.titles, ["• c", "• d", "• e"]);
    assert_eq!(content.more.as_deref(), Some("and 2 more..."));
}

#[test]
fn a_single_post_is_singular() {
    let calendar = calendar();
    let grid = calendar.grid();
    let mut ctl = InteractionController::new(Document::new(false));

    hover(&mut ctl, find(grid.cells(), day(2024, 6, 5)));
    assert_eq!(ctl.tooltip().unwrap().content.summary, "1 post");
}

#[test]
fn every_close_path_restores_scrolling() {
    let calendar = calendar();
    let grid = calendar.grid();
    let cell = find(grid.cells(), day(2024, 6, 1));

    for reason in [CloseReason::Button, CloseReason::Overlay, CloseReason::Escape] {
        let mut ctl = InteractionController::new(Document::new(false));
        assert!(ctl.click(cell));
        assert!(ctl.document().scroll_locked());
        ctl.close_modal(reason);
        assert!(!ctl.document().scroll_locked(), "{reason:?}");
        assert_eq!(ctl.modal_state(), ModalState::Idle);
    }
}

#[test]
fn escape_only_acts_on_an_open_modal() {
    let calendar = calendar();
    let grid = calendar.grid();
    let mut ctl = InteractionController::new(Document::new(false));

    assert!(!ctl.escape());
    ctl.click(find(grid.cells(), day(2024, 6, 1)));
    assert!(ctl.escape());
    assert!(ctl.modal().is_none());
    assert!(!ctl.escape());
}

#[test]
fn closing_restores_a_lock_that_was_already_there() {
    let calendar = calendar();
    let grid = calendar.grid();
    let mut ctl = InteractionController::new(Document::new(true));

    // replacing the modal must not lose the original value
    ctl.click(find(grid.cells(), day(2024, 6, 1)));
    ctl.click(find(grid.cells(), day(2024, 6, 3)));
    ctl.close_modal(CloseReason::Overlay);
    assert!(ctl.document().scroll_locked());
}

#[test]
fn untitled_and_padding_days_are_inert() {
    let calendar = calendar();
    let grid = calendar.grid();
    let mut ctl = InteractionController::new(Document::new(false));

    let untitled = find(grid.cells(), day(2024, 6, 5));
    assert!(untitled.hoverable());
    assert!(!untitled.clickable());
    assert!(!ctl.click(untitled));
    assert!(!ctl.document().scroll_locked());

    let padding = grid.cells().iter().find(|c| !c.in_range).unwrap();
    assert!(!hover(&mut ctl, padding));
    assert!(!ctl.click(padding));
    assert_eq!(ctl.overlay_count(), 0);
}

#[test]
fn tooltip_flips_below_near_the_top_edge() {
    let calendar = calendar();
    let grid = calendar.grid();
    let mut ctl = InteractionController::new(Document::new(false));

    ctl.pointer_enter(
        find(grid.cells(), day(2024, 6, 1)),
        Rect::new(4.0, 20.0, 12.0, 12.0),
        Size::new(1280.0, 800.0),
        PlacementRules::PAGE,
        |_| Size::new(180.0, 90.0),
    );
    let placement = ctl.tooltip().unwrap().placement;
    assert!(placement.below);
    assert_eq!(placement.top, 40.0);
    assert_eq!(placement.left, 10.0);
}
