//! State management for PerpX.
//!
//! This module provides centralized state management with a unidirectional
//! data flow pattern inspired by Redux/Elm architecture. Actions that need
//! the backend are intercepted by the app first and resolved into the plain
//! result actions handled here.

mod app_state;
mod profile_state;
mod strategy_state;
mod subscription_state;

pub use app_state::{AppState, InputMode, View};
pub use profile_state::{Invoice, ProfileState, UserProfile};
pub use strategy_state::{StrategyState, Submission};
pub use subscription_state::{Plan, SubscriptionFocus, SubscriptionState, Wallet, plans};

use crate::error::Result;
use crate::strategy::{Strategy, StrategyForm, StrategyId};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Actions that can be dispatched to modify state.
#[derive(Debug, Clone)]
pub enum Action {
    // Navigation
    Navigate(View),
    NavigateBack,
    SetInputMode(InputMode),

    // Session
    SessionRestored(Option<UserProfile>),

    // Strategy actions
    LoadStrategies,
    StrategiesLoaded(Vec<Strategy>),
    OpenStrategyForm,
    EditSelectedStrategy,
    CloseStrategyForm,
    FormInput(char),
    FormBackspace,
    FormNextField,
    FormPrevField,
    FormCycleChoice,
    SubmitStrategyForm,
    DeleteSelectedStrategy,
    StrategyAdded,
    StrategyUpdated(Strategy),
    StrategyDeleted(StrategyId),

    // Subscription actions
    ToggleSubscriptionFocus,
    ChooseWallet,
    Pay,
    PaymentCompleted,

    // Profile actions
    LoadInvoices,
    InvoicesLoaded(Vec<Invoice>),
    NextInvoicePage,
    PrevInvoicePage,
    StartEditEmail,
    EmailInput(char),
    EmailBackspace,
    SaveEmail,
    CancelEditEmail,
    EmailSaved(String),
    BindUser,
    BindGroup,

    // UI actions
    ScrollUp,
    ScrollDown,
    GoToTop,
    GoToBottom,
    ToggleHelp,
    ShowNotification(Notification),
    DismissNotification,

    // Data refresh
    RefreshAll,

    // Error handling
    SetError(String),
    ClearError,

    // Connection status
    SetConnected(bool),
    SetLoading(bool),

    // Quit
    Quit,
}

/// A notification to display to the user.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub duration_secs: u64,
    pub created_at: Instant,
}

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl Notification {
    fn with_level(message: impl Into<String>, level: NotificationLevel, duration_secs: u64) -> Self {
        Self {
            message: message.into(),
            level,
            duration_secs,
            created_at: Instant::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::with_level(message, NotificationLevel::Info, 3)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::with_level(message, NotificationLevel::Success, 3)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_level(message, NotificationLevel::Warning, 5)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_level(message, NotificationLevel::Error, 10)
    }

    /// Whether the notification has been shown for its full duration.
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= Duration::from_secs(self.duration_secs)
    }
}

/// The global state store.
#[derive(Debug)]
pub struct Store {
    /// Application state.
    pub app: AppState,
    /// Strategy state.
    pub strategies: StrategyState,
    /// Subscription state.
    pub subscription: SubscriptionState,
    /// Profile state.
    pub profile: ProfileState,
    /// Action sender for dispatching actions.
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Store {
    /// Create a new store with the given action sender.
    pub fn new(action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            app: AppState::default(),
            strategies: StrategyState::default(),
            subscription: SubscriptionState::default(),
            profile: ProfileState::default(),
            action_tx,
        }
    }

    /// Dispatch an action to the store.
    pub fn dispatch(&self, action: Action) -> Result<()> {
        self.action_tx
            .send(action)
            .map_err(|e| crate::Error::channel(e.to_string()))
    }

    /// A sender for tasks that dispatch actions later.
    pub fn sender(&self) -> mpsc::UnboundedSender<Action> {
        self.action_tx.clone()
    }

    /// Signed-in user, if any.
    pub fn user(&self) -> Option<&UserProfile> {
        self.profile.user.as_ref()
    }

    /// Validate the open strategy form for the signed-in user.
    pub fn strategy_submission(&self) -> Result<Option<Submission>> {
        let subscribed = self.user().is_some_and(UserProfile::is_subscribed);
        self.strategies.submission(subscribed)
    }

    /// Apply the backend's answer to a form submission.
    ///
    /// The form only closes when the change was accepted.
    pub fn finish_submission(&mut self, submission: Submission, accepted: bool) {
        let notification = match (submission, accepted) {
            (Submission::Add(_), true) => {
                self.reduce(Action::StrategyAdded);
                Notification::success("Strategy added")
            }
            (Submission::Update(strategy), true) => {
                self.reduce(Action::StrategyUpdated(strategy));
                Notification::success("Strategy updated")
            }
            (Submission::Add(_), false) => {
                Notification::warning("Failed to add strategy. Check your plan's strategy limit.")
            }
            (Submission::Update(_), false) => Notification::warning("Failed to update strategy"),
        };
        self.reduce(Action::ShowNotification(notification));
    }

    /// Drop the notification once it has been shown long enough.
    pub fn expire_notification(&mut self, now: Instant) {
        if self
            .app
            .notification
            .as_ref()
            .is_some_and(|n| n.is_expired(now))
        {
            self.app.notification = None;
        }
    }

    /// Apply an action to update state.
    pub fn reduce(&mut self, action: Action) {
        match action {
            // Navigation
            Action::Navigate(view) => self.navigate(view),
            Action::NavigateBack => self.navigate_back(),
            Action::SetInputMode(mode) => self.app.input_mode = mode,

            // Session
            Action::SessionRestored(user) => {
                self.profile.user = user;
                self.app.connected = true;
            }

            // Strategy actions
            Action::LoadStrategies => self.strategies.loading = true,
            Action::StrategiesLoaded(strategies) => {
                self.strategies.strategies = strategies;
                self.strategies.loading = false;
                self.strategies.last_updated = Some(chrono::Utc::now());
                self.strategies.clamp_selection();
            }
            Action::OpenStrategyForm => {
                self.strategies.form = Some(StrategyForm::new());
                self.app.input_mode = InputMode::Insert;
            }
            Action::EditSelectedStrategy => {
                if let Some(form) = self.strategies.selected().map(StrategyForm::edit) {
                    self.strategies.form = Some(form);
                    self.app.input_mode = InputMode::Insert;
                }
            }
            Action::CloseStrategyForm | Action::StrategyAdded => self.close_form(),
            Action::FormInput(c) => {
                if let Some(form) = self.strategies.form.as_mut() {
                    form.push_char(c);
                }
            }
            Action::FormBackspace => {
                if let Some(form) = self.strategies.form.as_mut() {
                    form.pop_char();
                }
            }
            Action::FormNextField => {
                if let Some(form) = self.strategies.form.as_mut() {
                    form.focus_next();
                }
            }
            Action::FormPrevField => {
                if let Some(form) = self.strategies.form.as_mut() {
                    form.focus_prev();
                }
            }
            Action::FormCycleChoice => {
                if let Some(form) = self.strategies.form.as_mut() {
                    form.cycle_choice();
                }
            }
            Action::StrategyUpdated(strategy) => {
                self.strategies.replace(strategy);
                self.close_form();
            }
            Action::StrategyDeleted(id) => self.strategies.remove(id),
            // Resolved by the app.
            Action::SubmitStrategyForm | Action::DeleteSelectedStrategy => {}

            // Subscription actions
            Action::ToggleSubscriptionFocus => {
                self.subscription.focus = match self.subscription.focus {
                    SubscriptionFocus::Plans => SubscriptionFocus::Wallets,
                    SubscriptionFocus::Wallets => SubscriptionFocus::Plans,
                };
            }
            Action::ChooseWallet => {
                self.subscription.selected_wallet =
                    Wallet::ALL.get(self.subscription.wallet_cursor).copied();
            }
            Action::Pay => {
                if self.subscription.can_pay() {
                    self.subscription.paying = true;
                }
            }
            Action::PaymentCompleted => {
                self.subscription.paying = false;
                self.app.notification = Some(Notification::success(
                    "Payment successful! Thank you for subscribing.",
                ));
            }

            // Profile actions
            Action::LoadInvoices => self.profile.loading = true,
            Action::InvoicesLoaded(invoices) => {
                self.profile.selected_invoice = (!invoices.is_empty()).then_some(0);
                self.profile.invoices = invoices;
                self.profile.loading = false;
            }
            Action::NextInvoicePage => {
                if self.profile.has_next_page() {
                    self.profile.page += 1;
                }
            }
            Action::PrevInvoicePage => {
                self.profile.page = self.profile.page.saturating_sub(1).max(1);
            }
            Action::StartEditEmail => {
                if let Some(user) = &self.profile.user {
                    self.profile.email_draft = Some(user.email.clone());
                    self.app.input_mode = InputMode::Insert;
                }
            }
            Action::EmailInput(c) => {
                if let Some(draft) = self.profile.email_draft.as_mut() {
                    draft.push(c);
                }
            }
            Action::EmailBackspace => {
                if let Some(draft) = self.profile.email_draft.as_mut() {
                    draft.pop();
                }
            }
            Action::CancelEditEmail => {
                self.profile.email_draft = None;
                self.app.input_mode = InputMode::Normal;
            }
            Action::EmailSaved(email) => {
                if let Some(user) = self.profile.user.as_mut() {
                    user.email = email;
                }
                self.profile.email_draft = None;
                self.app.input_mode = InputMode::Normal;
                self.app.notification = Some(Notification::success("Email updated"));
            }
            // Resolved by the app.
            Action::SaveEmail | Action::BindUser | Action::BindGroup => {}

            // UI actions
            Action::ScrollUp => self.scroll(-1),
            Action::ScrollDown => self.scroll(1),
            Action::GoToTop => self.scroll(i32::MIN / 2),
            Action::GoToBottom => self.scroll(i32::MAX / 2),
            Action::ToggleHelp => self.app.show_help = !self.app.show_help,
            Action::ShowNotification(notification) => {
                self.app.notification = Some(notification);
            }
            Action::DismissNotification => {
                self.app.notification = None;
            }

            // Data refresh
            Action::RefreshAll => {
                self.app.loading = true;
            }

            // Error handling
            Action::SetError(error) => {
                self.app.error = Some(error);
                self.app.loading = false;
                self.strategies.loading = false;
                self.profile.loading = false;
            }
            Action::ClearError => {
                self.app.error = None;
            }

            // Connection status
            Action::SetConnected(connected) => {
                self.app.connected = connected;
            }
            Action::SetLoading(loading) => {
                self.app.loading = loading;
            }

            // Quit
            Action::Quit => {
                self.app.should_quit = true;
            }
        }
    }

    fn navigate(&mut self, view: View) {
        let Some(index) = View::MENU.iter().position(|v| *v == view) else {
            return;
        };
        // Offsets are measured from the first menu entry.
        self.app.direction = index as i32;
        self.app.menu_index = index;
        self.app.current_view = view;
        self.app.show_help = false;
    }

    fn navigate_back(&mut self) {
        if self.app.current_view == View::Menu {
            return;
        }
        self.close_form();
        self.profile.email_draft = None;
        self.app.input_mode = InputMode::Normal;
        self.app.current_view = View::Menu;
        self.app.direction = -1;
    }

    fn close_form(&mut self) {
        self.strategies.form = None;
        self.app.input_mode = InputMode::Normal;
    }

    fn scroll(&mut self, delta: i32) {
        match self.app.current_view {
            View::Menu => {
                self.app.menu_index = clamp_index(self.app.menu_index, delta, View::MENU.len());
            }
            View::Strategies => {
                let len = self.strategies.strategies.len();
                if len > 0 {
                    let current = self.strategies.selected_index.unwrap_or(0);
                    self.strategies.selected_index = Some(clamp_index(current, delta, len));
                }
            }
            View::Subscription => self.subscription.move_cursor(delta),
            View::Profile => {
                let len = self.profile.invoices.len();
                if len > 0 {
                    let current = self.profile.selected_invoice.unwrap_or(0);
                    self.profile.selected_invoice = Some(clamp_index(current, delta, len));
                }
            }
            View::Calculator | View::Game => {}
        }
    }
}

fn clamp_index(current: usize, delta: i32, len: usize) -> usize {
    let max = len.saturating_sub(1) as i64;
    (current as i64 + delta as i64).clamp(0, max) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{FundingRateParams, StrategyKind};
    use pretty_assertions::assert_eq;

    fn store() -> Store {
        let (tx, _rx) = mpsc::unbounded_channel();
        Store::new(tx)
    }

    fn funding(id: StrategyId, rate: f64) -> Strategy {
        Strategy {
            id,
            symbol: "BTCUSDT".to_string(),
            created_at: None,
            kind: StrategyKind::FundingRate {
                params: FundingRateParams { funding_rate: rate },
            },
        }
    }

    #[test]
    fn test_navigate_records_direction() {
        let mut store = store();
        store.reduce(Action::Navigate(View::Subscription));
        assert_eq!(store.app.current_view, View::Subscription);
        assert_eq!(store.app.direction, 3);

        store.reduce(Action::NavigateBack);
        assert_eq!(store.app.current_view, View::Menu);
        assert_eq!(store.app.direction, -1);

        store.reduce(Action::Navigate(View::Calculator));
        assert_eq!(store.app.direction, 1);

        store.reduce(Action::NavigateBack);
        store.reduce(Action::Navigate(View::Strategies));
        assert_eq!(store.app.direction, 0);
    }

    #[test]
    fn test_direction_ignores_previous_page() {
        let mut store = store();
        store.reduce(Action::Navigate(View::Profile));
        assert_eq!(store.app.direction, 4);
        store.reduce(Action::NavigateBack);

        store.reduce(Action::Navigate(View::Subscription));
        assert_eq!(store.app.direction, 3);
    }

    #[test]
    fn test_navigate_back_on_menu_is_noop() {
        let mut store = store();
        store.reduce(Action::NavigateBack);
        assert_eq!(store.app.current_view, View::Menu);
        assert_eq!(store.app.direction, 0);
    }

    #[test]
    fn test_navigate_back_closes_form() {
        let mut store = store();
        store.reduce(Action::Navigate(View::Strategies));
        store.reduce(Action::OpenStrategyForm);
        assert!(store.app.is_editing());

        store.reduce(Action::NavigateBack);
        assert!(!store.strategies.is_form_open());
        assert_eq!(store.app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_strategy_crud_results() {
        let mut store = store();
        store.reduce(Action::StrategiesLoaded(vec![
            funding(1, 0.01),
            funding(2, 0.02),
        ]));
        assert_eq!(store.strategies.selected_index, Some(0));

        store.reduce(Action::StrategyUpdated(funding(2, 0.05)));
        assert_eq!(store.strategies.strategies[1], funding(2, 0.05));
        assert_eq!(store.strategies.strategies.len(), 2);

        store.reduce(Action::StrategyDeleted(1));
        assert_eq!(store.strategies.strategies, vec![funding(2, 0.05)]);
    }

    #[test]
    fn test_edit_selected_prefills_form() {
        let mut store = store();
        store.reduce(Action::StrategiesLoaded(vec![funding(7, 0.03)]));
        store.reduce(Action::EditSelectedStrategy);

        let form = store.strategies.form.as_ref().unwrap();
        assert_eq!(form.editing, Some(7));
        assert_eq!(form.funding_rate, "0.03");
    }

    #[test]
    fn test_wildcard_requires_subscription() {
        let mut store = store();
        assert_eq!(store.strategy_submission().unwrap(), None);

        store.reduce(Action::SessionRestored(Some(UserProfile {
            max_strategies: 0,
            ..Default::default()
        })));
        store.reduce(Action::OpenStrategyForm);
        store.strategies.form.as_mut().unwrap().symbol = " * ".to_string();

        let err = store.strategy_submission().unwrap_err();
        assert!(matches!(err, crate::Error::InvalidInput(_)));

        store.profile.user.as_mut().unwrap().max_strategies = 5;
        let submission = store.strategy_submission().unwrap().unwrap();
        assert!(matches!(submission, Submission::Add(ref s) if s.is_wildcard()));
    }

    #[test]
    fn test_form_stays_open_until_accepted() {
        let mut store = store();
        store.reduce(Action::OpenStrategyForm);
        store.strategies.form.as_mut().unwrap().symbol = "BTCUSDT".to_string();
        let submission = store.strategy_submission().unwrap().unwrap();

        store.finish_submission(submission.clone(), false);
        assert!(store.strategies.is_form_open());
        assert_eq!(
            store.app.notification.as_ref().map(|n| n.level),
            Some(NotificationLevel::Warning)
        );

        store.finish_submission(submission, true);
        assert!(!store.strategies.is_form_open());
        assert_eq!(store.app.input_mode, InputMode::Normal);
        assert_eq!(
            store.app.notification.as_ref().map(|n| n.level),
            Some(NotificationLevel::Success)
        );
    }

    #[test]
    fn test_edit_submission_updates_in_place() {
        let mut store = store();
        store.reduce(Action::StrategiesLoaded(vec![funding(7, 0.03)]));
        store.reduce(Action::EditSelectedStrategy);
        store.strategies.form.as_mut().unwrap().funding_rate = "0.05".to_string();

        let submission = store.strategy_submission().unwrap().unwrap();
        assert_eq!(submission, Submission::Update(funding(7, 0.05)));

        store.finish_submission(submission, true);
        assert_eq!(store.strategies.strategies, vec![funding(7, 0.05)]);
        assert!(!store.strategies.is_form_open());
    }

    #[test]
    fn test_pay_requires_wallet() {
        let mut store = store();
        store.reduce(Action::Navigate(View::Subscription));
        store.reduce(Action::Pay);
        assert!(!store.subscription.paying);

        store.reduce(Action::ToggleSubscriptionFocus);
        store.reduce(Action::ScrollDown);
        store.reduce(Action::ChooseWallet);
        assert_eq!(store.subscription.selected_wallet, Some(Wallet::MetaMask));

        store.reduce(Action::Pay);
        assert!(store.subscription.paying);
        assert!(!store.subscription.can_pay());

        store.reduce(Action::PaymentCompleted);
        assert!(!store.subscription.paying);
        assert_eq!(
            store.app.notification.as_ref().map(|n| n.level),
            Some(NotificationLevel::Success)
        );
    }

    #[test]
    fn test_email_edit_and_cancel() {
        let mut store = store();
        store.reduce(Action::SessionRestored(Some(UserProfile {
            email: "old@example.com".to_string(),
            ..Default::default()
        })));

        store.reduce(Action::StartEditEmail);
        store.reduce(Action::EmailBackspace);
        store.reduce(Action::EmailInput('x'));
        assert_eq!(
            store.profile.email_draft.as_deref(),
            Some("old@example.cox")
        );

        store.reduce(Action::CancelEditEmail);
        assert_eq!(store.profile.email_draft, None);
        assert_eq!(store.user().unwrap().email, "old@example.com");

        store.reduce(Action::StartEditEmail);
        store.reduce(Action::EmailSaved("new@example.com".to_string()));
        assert_eq!(store.user().unwrap().email, "new@example.com");
        assert!(!store.profile.is_editing_email());
    }

    #[test]
    fn test_email_edit_requires_user() {
        let mut store = store();
        store.reduce(Action::StartEditEmail);
        assert!(!store.profile.is_editing_email());
        assert!(!store.app.is_editing());
    }

    #[test]
    fn test_invoice_paging() {
        let mut store = store();
        store.reduce(Action::PrevInvoicePage);
        assert_eq!(store.profile.page, 1);

        store.reduce(Action::NextInvoicePage);
        assert_eq!(store.profile.page, 1);

        store.reduce(Action::InvoicesLoaded(vec![Invoice::default(); 10]));
        store.reduce(Action::NextInvoicePage);
        assert_eq!(store.profile.page, 2);
    }

    #[test]
    fn test_menu_scroll_is_clamped() {
        let mut store = store();
        store.reduce(Action::ScrollUp);
        assert_eq!(store.app.menu_index, 0);
        store.reduce(Action::GoToBottom);
        assert_eq!(store.app.selected_menu_view(), View::Profile);
    }

    #[test]
    fn test_notification_expiry() {
        let mut store = store();
        let mut note = Notification::info("hello");
        let shown = note.created_at;
        note.duration_secs = 3;
        store.reduce(Action::ShowNotification(note));

        store.expire_notification(shown + Duration::from_secs(1));
        assert!(store.app.notification.is_some());
        store.expire_notification(shown + Duration::from_secs(3));
        assert!(store.app.notification.is_none());
    }
}
