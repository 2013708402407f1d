//! UI widgets for the TUI application
//!
//! Reusable components used by the TUI for rendering the gallery,
//! notifications, lightbox overlay and help popup.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub mod gallery_widget;
pub mod help_widget;
pub mod lightbox_widget;
pub mod toast_widget;

/// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
