//! Layout management for the TUI.

use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

/// UI layout areas.
pub struct Layout {
    /// Status bar area (top).
    pub status_area: Rect,
    /// Page header area.
    pub header_area: Rect,
    /// Main content area.
    pub main_area: Rect,
    /// Key hint bar (bottom). Zero-height when hidden.
    pub hint_area: Rect,
    /// Notification area (overlaid).
    pub notification_area: Rect,
}

impl Layout {
    /// Create a new layout from the terminal area.
    pub fn new(area: Rect, show_status_bar: bool, show_hint_bar: bool) -> Self {
        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(u16::from(show_status_bar)),
                Constraint::Length(2), // Page header
                Constraint::Min(0),    // Main content
                Constraint::Length(u16::from(show_hint_bar)),
            ])
            .split(area);

        // Notification area is centered horizontally near the bottom
        let height = 3.min(area.height);
        let notification_area = Rect {
            x: area.x + area.width / 8,
            y: area.y + area.height.saturating_sub(height + 2),
            width: area.width - area.width / 4,
            height,
        };

        Self {
            status_area: chunks[0],
            header_area: chunks[1],
            main_area: chunks[2],
            hint_area: chunks[3],
            notification_area,
        }
    }
}

/// Area left for a page displaced by `shift` columns.
///
/// A positive shift moves the left edge right. A negative shift keeps the
/// left edge and pulls the right edge in, so a page entering from the left
/// grows in place rather than sliding. Widgets lay out inside the returned
/// area, which is never wider than `area`.
pub fn shifted(area: Rect, shift: i32) -> Rect {
    let width = i32::from(area.width);
    let shift = shift.clamp(-width, width);
    let visible = (width - shift.abs()) as u16;

    if shift >= 0 {
        Rect {
            x: area.x + shift as u16,
            width: visible,
            ..area
        }
    } else {
        Rect {
            width: visible,
            ..area
        }
    }
}

/// Create a centered popup area.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    RatatuiLayout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_rows() {
        let layout = Layout::new(Rect::new(0, 0, 80, 24), true, true);
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.header_area.y, 1);
        assert_eq!(layout.main_area.height, 20);
        assert_eq!(layout.hint_area.y, 23);

        let bare = Layout::new(Rect::new(0, 0, 80, 24), false, false);
        assert_eq!(bare.main_area.height, 22);
    }

    #[test]
    fn test_shifted_clips() {
        let area = Rect::new(2, 3, 40, 10);
        assert_eq!(shifted(area, 0), area);
        assert_eq!(shifted(area, 10), Rect::new(12, 3, 30, 10));
        assert_eq!(shifted(area, 100).width, 0);
    }

    #[test]
    fn test_negative_shift_keeps_left_edge() {
        let area = Rect::new(2, 3, 40, 10);
        let page = shifted(area, -10);
        assert_eq!(page.left(), area.left());
        assert_eq!(page.right(), area.right() - 10);
        assert_eq!(shifted(area, -100), Rect::new(2, 3, 0, 10));
    }
}
