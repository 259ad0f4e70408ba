//! Event handler for processing input events.

use super::Keymap;
use crate::state::{Action, InputMode, Store, SubscriptionFocus, View};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};

/// Maps key and mouse input to actions for the current page.
pub struct EventHandler {
    keymap: Keymap,
    snapshot: StoreSnapshot,
}

/// Snapshot of relevant store state for event handling.
#[derive(Debug, Clone, Default)]
struct StoreSnapshot {
    input_mode: InputMode,
    current_view: View,
    menu_view: View,
    form_open: bool,
    editing_email: bool,
    subscription_focus: SubscriptionFocus,
    show_help: bool,
}

impl EventHandler {
    /// Create a new event handler.
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            snapshot: StoreSnapshot::default(),
        }
    }

    /// Update the store snapshot for state-aware event handling.
    pub fn update_store_snapshot(&mut self, store: &Store) {
        self.snapshot = StoreSnapshot {
            input_mode: store.app.input_mode,
            current_view: store.app.current_view,
            menu_view: store.app.selected_menu_view(),
            form_open: store.strategies.is_form_open(),
            editing_email: store.profile.is_editing_email(),
            subscription_focus: store.subscription.focus,
            show_help: store.app.show_help,
        };
    }

    /// Handle a key event and return an optional action.
    pub fn handle_key(&self, key: KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Action::Quit);
        }

        match self.snapshot.input_mode {
            InputMode::Normal => self.handle_normal_mode(key),
            InputMode::Insert => self.handle_insert_mode(key),
        }
    }

    /// Handle a mouse event and return an optional action.
    ///
    /// Drags are not mapped here; they feed the swipe-back gesture.
    pub fn handle_mouse(&self, mouse: &MouseEvent) -> Option<Action> {
        match mouse.kind {
            MouseEventKind::ScrollUp => Some(Action::ScrollUp),
            MouseEventKind::ScrollDown => Some(Action::ScrollDown),
            _ => None,
        }
    }

    fn handle_normal_mode(&self, key: KeyEvent) -> Option<Action> {
        let keys = &self.keymap;

        if self.snapshot.show_help {
            return (keys.help.matches(&key) || keys.back.matches(&key))
                .then_some(Action::ToggleHelp);
        }

        // Global shortcuts
        if keys.quit.matches(&key) {
            return Some(Action::Quit);
        }
        if keys.help.matches(&key) {
            return Some(Action::ToggleHelp);
        }
        if keys.refresh.matches(&key) {
            return Some(Action::RefreshAll);
        }
        if keys.back.matches(&key) || key.code == KeyCode::Backspace {
            return Some(Action::NavigateBack);
        }

        // Navigation
        if keys.up.matches(&key) || key.code == KeyCode::Up {
            return Some(Action::ScrollUp);
        }
        if keys.down.matches(&key) || key.code == KeyCode::Down {
            return Some(Action::ScrollDown);
        }
        if key.code == KeyCode::Home {
            return Some(Action::GoToTop);
        }
        if key.code == KeyCode::End {
            return Some(Action::GoToBottom);
        }

        // View-specific actions
        match self.snapshot.current_view {
            View::Menu => self.handle_menu(key),
            View::Strategies => self.handle_strategies(key),
            View::Subscription => self.handle_subscription(key),
            View::Profile => self.handle_profile(key),
            View::Calculator | View::Game => None,
        }
    }

    fn handle_menu(&self, key: KeyEvent) -> Option<Action> {
        if self.keymap.select.matches(&key) || key.code == KeyCode::Right {
            return Some(Action::Navigate(self.snapshot.menu_view));
        }

        // Number keys jump straight to a menu entry.
        if let KeyCode::Char(c) = key.code
            && let Some(n) = c.to_digit(10)
            && (1..=View::MENU.len() as u32).contains(&n)
        {
            return Some(Action::Navigate(View::MENU[n as usize - 1]));
        }

        None
    }

    fn handle_strategies(&self, key: KeyEvent) -> Option<Action> {
        let keys = &self.keymap;

        if keys.add.matches(&key) {
            return Some(Action::OpenStrategyForm);
        }
        if keys.edit.matches(&key) || keys.select.matches(&key) {
            return Some(Action::EditSelectedStrategy);
        }
        if keys.delete.matches(&key) {
            return Some(Action::DeleteSelectedStrategy);
        }

        None
    }

    fn handle_subscription(&self, key: KeyEvent) -> Option<Action> {
        let keys = &self.keymap;

        if keys.pay.matches(&key) {
            return Some(Action::Pay);
        }
        if key.code == KeyCode::Tab || key.code == KeyCode::BackTab {
            return Some(Action::ToggleSubscriptionFocus);
        }
        if keys.select.matches(&key) {
            return Some(match self.snapshot.subscription_focus {
                SubscriptionFocus::Plans => Action::ToggleSubscriptionFocus,
                SubscriptionFocus::Wallets => Action::ChooseWallet,
            });
        }

        None
    }

    fn handle_profile(&self, key: KeyEvent) -> Option<Action> {
        let keys = &self.keymap;

        if keys.edit.matches(&key) {
            return Some(Action::StartEditEmail);
        }
        if keys.next_page.matches(&key) {
            return Some(Action::NextInvoicePage);
        }
        if keys.prev_page.matches(&key) {
            return Some(Action::PrevInvoicePage);
        }
        if keys.bind_user.matches(&key) {
            return Some(Action::BindUser);
        }
        if keys.bind_group.matches(&key) {
            return Some(Action::BindGroup);
        }

        None
    }

    fn handle_insert_mode(&self, key: KeyEvent) -> Option<Action> {
        if self.snapshot.form_open {
            return match key.code {
                KeyCode::Esc => Some(Action::CloseStrategyForm),
                KeyCode::Enter => Some(Action::SubmitStrategyForm),
                KeyCode::Tab | KeyCode::Down => Some(Action::FormNextField),
                KeyCode::BackTab | KeyCode::Up => Some(Action::FormPrevField),
                KeyCode::Left | KeyCode::Right => Some(Action::FormCycleChoice),
                KeyCode::Backspace => Some(Action::FormBackspace),
                KeyCode::Char(c) => Some(Action::FormInput(c)),
                _ => None,
            };
        }

        if self.snapshot.editing_email {
            return match key.code {
                KeyCode::Esc => Some(Action::CancelEditEmail),
                KeyCode::Enter => Some(Action::SaveEmail),
                KeyCode::Backspace => Some(Action::EmailBackspace),
                KeyCode::Char(c) => Some(Action::EmailInput(c)),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(Action::SetInputMode(InputMode::Normal)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyBindings;
    use tokio::sync::mpsc;

    fn handler() -> EventHandler {
        EventHandler::new(Keymap::try_from(&KeyBindings::default()).unwrap())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn store() -> Store {
        let (tx, _rx) = mpsc::unbounded_channel();
        Store::new(tx)
    }

    #[test]
    fn test_menu_enter_opens_highlighted_page() {
        let mut store = store();
        store.reduce(Action::ScrollDown);
        let mut handler = handler();
        handler.update_store_snapshot(&store);

        assert!(matches!(
            handler.handle_key(key(KeyCode::Enter)),
            Some(Action::Navigate(View::Calculator))
        ));
        assert!(matches!(
            handler.handle_key(key(KeyCode::Char('5'))),
            Some(Action::Navigate(View::Profile))
        ));
        assert!(handler.handle_key(key(KeyCode::Char('9'))).is_none());
    }

    #[test]
    fn test_escape_and_backspace_go_back() {
        let mut store = store();
        store.reduce(Action::Navigate(View::Game));
        let mut handler = handler();
        handler.update_store_snapshot(&store);

        assert!(matches!(
            handler.handle_key(key(KeyCode::Esc)),
            Some(Action::NavigateBack)
        ));
        assert!(matches!(
            handler.handle_key(key(KeyCode::Backspace)),
            Some(Action::NavigateBack)
        ));
    }

    #[test]
    fn test_form_captures_typing() {
        let mut store = store();
        store.reduce(Action::Navigate(View::Strategies));
        store.reduce(Action::OpenStrategyForm);
        let mut handler = handler();
        handler.update_store_snapshot(&store);

        assert!(matches!(
            handler.handle_key(key(KeyCode::Char('q'))),
            Some(Action::FormInput('q'))
        ));
        assert!(matches!(
            handler.handle_key(key(KeyCode::Esc)),
            Some(Action::CloseStrategyForm)
        ));
        assert!(matches!(
            handler.handle_key(key(KeyCode::Enter)),
            Some(Action::SubmitStrategyForm)
        ));
    }

    #[test]
    fn test_subscription_select_depends_on_focus() {
        let mut store = store();
        store.reduce(Action::Navigate(View::Subscription));
        let mut handler = handler();
        handler.update_store_snapshot(&store);
        assert!(matches!(
            handler.handle_key(key(KeyCode::Enter)),
            Some(Action::ToggleSubscriptionFocus)
        ));

        store.reduce(Action::ToggleSubscriptionFocus);
        handler.update_store_snapshot(&store);
        assert!(matches!(
            handler.handle_key(key(KeyCode::Enter)),
            Some(Action::ChooseWallet)
        ));
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut store = store();
        store.reduce(Action::ToggleHelp);
        let mut handler = handler();
        handler.update_store_snapshot(&store);

        assert!(handler.handle_key(key(KeyCode::Char('q'))).is_none());
        assert!(matches!(
            handler.handle_key(key(KeyCode::Esc)),
            Some(Action::ToggleHelp)
        ));
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let mut store = store();
        store.reduce(Action::Navigate(View::Strategies));
        store.reduce(Action::OpenStrategyForm);
        let mut handler = handler();
        handler.update_store_snapshot(&store);

        assert!(matches!(
            handler.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        ));
    }
}
