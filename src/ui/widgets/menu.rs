//! Main menu widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::state::{Store, View};
use crate::ui::Theme;

/// Menu of the five destinations.
pub struct Menu;

impl Menu {
    /// Render the menu.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, theme: &Theme) {
        let items: Vec<ListItem> = View::MENU
            .iter()
            .enumerate()
            .map(|(i, view)| {
                let mut title = vec![
                    Span::styled(format!("{} ", i + 1), Style::default().fg(theme.muted)),
                    Span::styled(
                        view.title(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ];
                if view.external_url().is_some() {
                    title.push(Span::styled(" ↗", Style::default().fg(theme.muted)));
                }

                ListItem::new(vec![
                    Line::from(title),
                    Line::from(Span::styled(
                        format!("  {}", view.subtitle()),
                        Style::default().fg(theme.muted),
                    )),
                    Line::from(""),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(" PerpX ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.border)),
            )
            .highlight_style(
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        let mut state = ListState::default();
        state.select(Some(store.app.menu_index));

        frame.render_stateful_widget(list, area, &mut state);
    }
}
