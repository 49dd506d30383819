use std::error::Error as StdError;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Top-level message joined with its innermost cause, e.g.
/// `failed to write catalog file x.json: Permission denied`.
pub(crate) fn surface_error(err: &(dyn StdError + 'static)) -> String {
    let mut root = err;
    while let Some(source) = root.source() {
        root = source;
    }
    if std::ptr::addr_eq(root, err) {
        err.to_string()
    } else {
        format!("{err}: {root}")
    }
}

/// `1 book`, `3 books`.
pub(crate) fn book_count(count: usize) -> String {
    if count == 1 {
        "1 book".to_string()
    } else {
        format!("{count} books")
    }
}
