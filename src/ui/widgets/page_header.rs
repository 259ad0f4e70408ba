//! Page header widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::{Store, View};
use crate::ui::Theme;

/// Title of the current page with page dots and a back hint.
pub struct PageHeader;

impl PageHeader {
    /// Render the page header.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, theme: &Theme) {
        let view = store.app.current_view;

        let mut title = vec![Span::styled(
            format!(" {} ", view.title()),
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        )];
        if view != View::Menu {
            title.push(Span::styled(
                " Esc or swipe right to go back",
                Style::default().fg(theme.muted),
            ));
        }

        let mut dots = vec![Span::raw(" ")];
        for (i, page) in View::MENU.iter().enumerate() {
            let active = *page == view || (view == View::Menu && i == store.app.menu_index);
            let style = if active {
                Style::default().fg(theme.accent)
            } else {
                Style::default().fg(theme.border)
            };
            dots.push(Span::styled(if active { "● " } else { "○ " }, style));
        }

        let paragraph = Paragraph::new(vec![Line::from(title), Line::from(dots)]);
        frame.render_widget(paragraph, area);
    }
}
