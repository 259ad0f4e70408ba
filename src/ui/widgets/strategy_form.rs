//! Add/edit strategy popup.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::super::layout::centered_rect;
use crate::strategy::StrategyForm;
use crate::ui::Theme;

/// Popup form for creating or editing a strategy.
pub struct StrategyFormPopup;

impl StrategyFormPopup {
    pub fn render(frame: &mut Frame, area: Rect, form: &StrategyForm, theme: &Theme) {
        let popup_area = centered_rect(60, 70, area);
        frame.render_widget(Clear, popup_area);

        let focused = form.focused();
        let mut lines = vec![Line::from("")];

        for field in form.fields() {
            let is_focused = *field == focused;
            let label_style = if is_focused {
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.muted)
            };

            let value = form.value(*field);
            let value_span = if field.is_choice() {
                Span::raw(format!("◀ {value} ▶"))
            } else if is_focused {
                Span::styled(
                    format!("{value}█"),
                    Style::default().add_modifier(Modifier::UNDERLINED),
                )
            } else {
                Span::raw(value)
            };

            lines.push(Line::from(vec![
                Span::styled(if is_focused { "▶ " } else { "  " }, label_style),
                Span::styled(format!("{:<20}", field.label()), label_style),
                value_span,
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Use * as the symbol to watch every pair",
            Style::default().fg(theme.muted),
        )));
        lines.push(Line::from(Span::styled(
            "  Tab next field  ←/→ change  Enter save  Esc cancel",
            Style::default().fg(theme.muted),
        )));

        let title = if form.is_editing() {
            " Edit Strategy "
        } else {
            " Add Strategy "
        };

        let popup = Paragraph::new(lines).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.primary)),
        );

        frame.render_widget(popup, popup_area);
    }
}
