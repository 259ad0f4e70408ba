//! Application-level state.

use super::Notification;

/// The current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Menu,
    Strategies,
    Calculator,
    Game,
    Subscription,
    Profile,
}

impl View {
    /// Destinations listed on the menu, in order.
    pub const MENU: [View; 5] = [
        View::Strategies,
        View::Calculator,
        View::Game,
        View::Subscription,
        View::Profile,
    ];

    /// Page title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Menu => "PerpX",
            Self::Strategies => "Strategy Management",
            Self::Calculator => "Position Calculator",
            Self::Game => "Mini Game",
            Self::Subscription => "Subscription",
            Self::Profile => "Profile",
        }
    }

    /// One-line description shown on the menu.
    pub fn subtitle(&self) -> &'static str {
        match self {
            Self::Menu => "Pick a feature to get started",
            Self::Strategies => "Add and manage trading strategies",
            Self::Calculator => "Size positions precisely",
            Self::Game => "Take a break",
            Self::Subscription => "Choose a subscription plan",
            Self::Profile => "Account and payment history",
        }
    }

    /// External page embedded by placeholder views.
    pub fn external_url(&self) -> Option<&'static str> {
        match self {
            Self::Calculator => Some("https://calc.bitsflea.com"),
            Self::Game => Some("https://rocketrise.pages.dev"),
            _ => None,
        }
    }
}

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into a text field.
    Insert,
}

/// Global application state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Current page.
    pub current_view: View,
    /// Direction of the latest page change: positive enters from the right.
    pub direction: i32,
    /// Highlighted menu entry.
    pub menu_index: usize,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Whether to show help overlay.
    pub show_help: bool,
    /// Current notification.
    pub notification: Option<Notification>,
    /// Current error message.
    pub error: Option<String>,
    /// Whether the app is loading data.
    pub loading: bool,
    /// Whether the backend answered the last request.
    pub connected: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl AppState {
    /// Create a new application state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if in an input mode.
    pub fn is_editing(&self) -> bool {
        self.input_mode == InputMode::Insert
    }

    /// Menu destination under the cursor.
    pub fn selected_menu_view(&self) -> View {
        View::MENU[self.menu_index.min(View::MENU.len() - 1)]
    }
}
