//! Help panel widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::super::Theme;
use super::super::layout::centered_rect;
use crate::config::KeyBindings;

/// Help panel showing keybindings.
pub struct HelpPanel;

impl HelpPanel {
    /// Render the help panel using the configured keys.
    pub fn render(frame: &mut Frame, area: Rect, keys: &KeyBindings, theme: &Theme) {
        let popup_area = centered_rect(60, 80, area);

        // Clear the area behind the popup
        frame.render_widget(Clear, popup_area);

        let up_down = format!("{}/{}", keys.up, keys.down);
        let pages = format!("{}/{}", keys.prev_page, keys.next_page);

        let sections: [(&str, Vec<(&str, &str)>); 4] = [
            (
                "Navigation",
                vec![
                    (up_down.as_str(), "Move up/down"),
                    (keys.select.as_str(), "Open/confirm"),
                    ("1-5", "Jump to a menu entry"),
                    (keys.back.as_str(), "Back to menu"),
                    ("Drag →", "Swipe back to menu"),
                ],
            ),
            (
                "Strategies",
                vec![
                    (keys.add.as_str(), "Add strategy"),
                    (keys.edit.as_str(), "Edit strategy"),
                    (keys.delete.as_str(), "Delete strategy"),
                    ("Tab", "Next form field"),
                    ("←/→", "Change type or period"),
                ],
            ),
            (
                "Subscription & Profile",
                vec![
                    ("Tab", "Switch plans/wallets"),
                    (keys.pay.as_str(), "Pay for plan"),
                    (keys.edit.as_str(), "Edit email"),
                    (pages.as_str(), "Invoice pages"),
                    (keys.bind_user.as_str(), "Bind private chat"),
                    (keys.bind_group.as_str(), "Bind group"),
                ],
            ),
            (
                "General",
                vec![
                    (keys.refresh.as_str(), "Refresh data"),
                    (keys.help.as_str(), "Toggle help"),
                    (keys.quit.as_str(), "Quit"),
                ],
            ),
        ];

        let mut help_text = Vec::new();
        for (title, entries) in sections {
            if !help_text.is_empty() {
                help_text.push(Line::from(""));
            }
            help_text.push(Line::from(Span::styled(
                title,
                Style::default()
                    .fg(theme.warning)
                    .add_modifier(Modifier::BOLD),
            )));
            for (key, description) in entries {
                help_text.push(Line::from(vec![
                    Span::styled(format!("  {key:<8}"), Style::default().fg(theme.primary)),
                    Span::raw(description),
                ]));
            }
        }

        let help = Paragraph::new(help_text)
            .block(
                Block::default()
                    .title(" Help ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.warning)),
            )
            .style(Style::default().fg(Color::White));

        frame.render_widget(help, popup_area);
    }
}
