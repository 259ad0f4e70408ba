//! Placeholder for pages hosted outside the app.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::state::View;
use crate::ui::Theme;

pub struct Placeholder;

impl Placeholder {
    pub fn render(frame: &mut Frame, area: Rect, view: View, theme: &Theme) {
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                view.title(),
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(view.subtitle(), Style::default().fg(theme.muted))),
            Line::from(""),
        ];
        if let Some(url) = view.external_url() {
            lines.push(Line::from(vec![
                Span::raw("Open in a browser: "),
                Span::styled(url, Style::default().fg(theme.accent)),
            ]));
        }
        lines.push(Line::from(Span::styled(
            "Coming soon to the terminal",
            Style::default()
                .fg(theme.muted)
                .add_modifier(Modifier::ITALIC),
        )));

        let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        );
        frame.render_widget(paragraph, area);
    }
}
