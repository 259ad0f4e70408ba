//! UI rendering using ratatui.
//!
//! Every frame is drawn from the store plus the navigator's animation
//! state: the page area is shifted sideways by the page transition and by
//! the swipe-back drag offset.

mod layout;
mod theme;
mod widgets;

pub use layout::{Layout, centered_rect, shifted};
pub use theme::Theme;
pub use widgets::{
    HelpPanel, Menu, PageHeader, Placeholder, ProfilePage, StatusBar, StrategyFormPopup,
    StrategyList, SubscriptionPage,
};

use crate::config::Config;
use crate::navigation::Navigator;
use crate::state::{Store, View};
use ratatui::{
    Frame,
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

/// Main UI renderer.
pub struct Ui;

impl Ui {
    /// Render the entire UI.
    pub fn render(
        frame: &mut Frame,
        store: &Store,
        navigator: &Navigator,
        config: &Config,
        theme: &Theme,
    ) {
        let layout = Layout::new(
            frame.area(),
            config.ui.show_status_bar,
            config.ui.show_help_bar,
        );

        if config.ui.show_status_bar {
            StatusBar::render(frame, layout.status_area, store, theme);
        }

        PageHeader::render(frame, layout.header_area, store, theme);

        let page_area = shifted(
            layout.main_area,
            navigator.shift_columns(layout.main_area.width),
        );
        frame.render_widget(Clear, layout.main_area);

        if page_area.width > 0 {
            match navigator.view() {
                View::Menu => Menu::render(frame, page_area, store, theme),
                View::Strategies => StrategyList::render(frame, page_area, store, theme),
                View::Subscription => SubscriptionPage::render(frame, page_area, store, theme),
                View::Profile => {
                    ProfilePage::render(frame, page_area, store, &config.telegram, theme)
                }
                view @ (View::Calculator | View::Game) => {
                    Placeholder::render(frame, page_area, view, theme)
                }
            }
        }

        if let Some(form) = &store.strategies.form {
            StrategyFormPopup::render(frame, layout.main_area, form, theme);
        }

        if config.ui.show_help_bar {
            render_hint_bar(frame, layout.hint_area, store, theme);
        }

        // Render help panel if visible
        if store.app.show_help {
            HelpPanel::render(frame, frame.area(), &config.keybindings, theme);
        }

        // Render notification if present
        if let Some(notification) = &store.app.notification {
            widgets::render_notification(frame, layout.notification_area, notification, theme);
        }

        // Render error if present
        if let Some(error) = &store.app.error {
            widgets::render_error(frame, layout.notification_area, error, theme);
        }
    }
}

fn render_hint_bar(frame: &mut Frame, area: ratatui::layout::Rect, store: &Store, theme: &Theme) {
    let hint = if store.strategies.is_form_open() {
        "Tab next  ←/→ change  Enter save  Esc cancel"
    } else if store.profile.is_editing_email() {
        "Enter save  Esc cancel"
    } else {
        match store.app.current_view {
            View::Menu => "↑/↓ move  Enter open  1-5 jump  q quit",
            View::Strategies => "a add  e edit  d delete  Esc back",
            View::Subscription => "Tab plans/wallets  Enter choose  p pay  Esc back",
            View::Profile => "e email  [/] pages  u/g bind  Esc back",
            View::Calculator | View::Game => "Esc back",
        }
    };

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {hint}"),
            Style::default().fg(theme.muted),
        ))),
        area,
    );
}
