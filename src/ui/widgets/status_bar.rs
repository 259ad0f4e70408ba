//! Status bar widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::Store;
use crate::ui::Theme;

/// Status bar widget.
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, theme: &Theme) {
        let connection_status = if store.app.connected {
            Span::styled("● Online", Style::default().fg(theme.success))
        } else {
            Span::styled("○ Offline", Style::default().fg(theme.error))
        };

        let account = match store.user() {
            Some(user) if user.is_subscribed() => Span::styled(
                format!(" {} ", user.display_name()),
                Style::default().fg(theme.accent),
            ),
            Some(user) => Span::styled(
                format!(" {} (no plan) ", user.display_name()),
                Style::default().fg(theme.warning),
            ),
            None => Span::styled(" Signed out ", Style::default().fg(theme.muted)),
        };

        let loading = if store.app.loading || store.strategies.loading || store.profile.loading {
            Span::styled(
                " Loading... ",
                Style::default()
                    .fg(theme.warning)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Span::raw("")
        };

        let help_hint = Span::styled(" Press ? for help ", Style::default().fg(theme.muted));

        let left_content = vec![
            Span::styled(
                " PerpX ",
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            connection_status,
            Span::raw(" | "),
            account,
            loading,
        ];

        let status_line = Line::from(left_content);

        // Pad so the help hint is right-aligned
        let left_len = status_line.width();
        let right_len = help_hint.width();
        let padding = usize::from(area.width).saturating_sub(left_len + right_len);

        let mut full_line = status_line.spans;
        full_line.push(Span::raw(" ".repeat(padding)));
        full_line.push(help_hint);

        let paragraph =
            Paragraph::new(Line::from(full_line)).style(Style::default().bg(Color::Black));

        frame.render_widget(paragraph, area);
    }
}
