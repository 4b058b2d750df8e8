//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main screen layout areas
pub struct MainLayout {
    pub header: Rect,
    pub form: Rect,
    pub results: Rect,
    pub help: Rect,
}

/// Height of the form panel: four fields, button, error line, borders
pub const FORM_HEIGHT: u16 = 14;

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Header on top, help bar at the bottom; form on the left, results on the right
///
/// Narrow terminals stack the form above the results instead.
pub fn calculate_main_layout(area: Rect) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let body = main_chunks[1];
    let (form, results) = if body.width >= 80 {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(44), Constraint::Min(0)])
            .split(body);
        (chunks[0], chunks[1])
    } else {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(FORM_HEIGHT), Constraint::Min(0)])
            .split(body);
        (chunks[0], chunks[1])
    };

    MainLayout {
        header: main_chunks[0],
        form,
        results,
        help: main_chunks[2],
    }
}
