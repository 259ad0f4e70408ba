//! Main application module.
//!
//! This module contains the main `App` struct that coordinates
//! the event loop, state management, navigation and rendering.

use crate::api::PerpxClientBuilder;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::{Event, EventConfig, EventHandler, EventLoop, Keymap};
use crate::navigation::Navigator;
use crate::session::{Session, TokenStore};
use crate::state::{Action, Notification, Store, Submission, View};
use crate::ui::{Theme, Ui};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// How long the simulated payment takes.
const PAYMENT_DELAY: Duration = Duration::from_secs(2);

/// Init data used to sign in to the demo backend.
const DEMO_INIT_DATA: &str = "user=demo";

/// The main application.
pub struct App {
    /// Terminal.
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application store.
    store: Store,
    /// Key and mouse mapping.
    event_handler: EventHandler,
    /// Terminal events and frame ticks.
    event_rx: mpsc::UnboundedReceiver<Event>,
    event_task: JoinHandle<()>,
    /// Action receiver.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Signed-in session and backend client.
    session: Session,
    /// Page transitions and swipe-back.
    navigator: Navigator,
    theme: Theme,
    /// Configuration.
    config: Config,
}

impl App {
    /// Create a new application.
    pub async fn new(config: Config) -> Result<Self> {
        let keymap = Keymap::try_from(&config.keybindings)?;
        let theme = Theme::from_config(&config.theme);

        let client = PerpxClientBuilder::new().config(config.api.clone()).build()?;
        let init_data = config
            .telegram
            .init_data
            .clone()
            .or_else(|| config.api.demo.then(|| DEMO_INIT_DATA.to_string()));
        let session = Session::new(client, TokenStore::in_data_dir()?, init_data);

        // Create action channel
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let navigator = Navigator::new(&config.gesture, action_tx.clone())?;

        let mut store = Store::new(action_tx);
        store.profile.page_size = config.ui.invoices_per_page.max(1);

        // Set up terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        if config.ui.mouse_support {
            execute!(stdout, EnableMouseCapture)?;
        }
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        let (event_rx, event_task) = EventLoop::new(
            EventConfig::default()
                .with_tick_rate_ms(config.ui.tick_rate_ms)
                .with_mouse_capture(config.ui.mouse_support),
        )
        .start();

        Ok(Self {
            terminal,
            store,
            event_handler: EventHandler::new(keymap),
            event_rx,
            event_task,
            action_rx,
            session,
            navigator,
            theme,
            config,
        })
    }

    /// Run the application event loop.
    pub async fn run(&mut self) -> Result<()> {
        match self.session.restore().await {
            Ok(user) => self.store.reduce(Action::SessionRestored(user)),
            Err(e) => {
                warn!("Sign-in failed: {}", e);
                self.report(e);
            }
        }

        // Main event loop
        loop {
            // Update event handler with current state
            self.event_handler.update_store_snapshot(&self.store);

            // Render UI
            self.terminal.draw(|frame| {
                Ui::render(
                    frame,
                    &self.store,
                    &self.navigator,
                    &self.config,
                    &self.theme,
                );
            })?;

            tokio::select! {
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event).await?;
                }

                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action).await?;
                }

                else => break,
            }

            // Check if we should quit
            if self.store.app.should_quit {
                break;
            }
        }

        Ok(())
    }

    async fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Tick(dt) => {
                self.navigator.tick(dt);
                self.store.expire_notification(Instant::now());
            }
            Event::Key(key) => {
                if let Some(action) = self.event_handler.handle_key(key) {
                    self.handle_action(action).await?;
                }
            }
            Event::Mouse(mouse) => {
                let accept_presses =
                    !self.store.strategies.is_form_open() && !self.store.app.is_editing();
                self.navigator.handle_mouse(&mouse, accept_presses);
                if let Some(action) = self.event_handler.handle_mouse(&mouse) {
                    self.handle_action(action).await?;
                }
            }
            Event::Paste(text) => {
                let editing_form = self.store.strategies.is_form_open();
                let editing_email = self.store.profile.is_editing_email();
                for c in text.chars().filter(|c| !c.is_control()) {
                    if editing_form {
                        self.store.reduce(Action::FormInput(c));
                    } else if editing_email {
                        self.store.reduce(Action::EmailInput(c));
                    }
                }
            }
            Event::Resize(width, height) => debug!(width, height, "Terminal resized"),
            Event::FocusGained | Event::FocusLost => {}
        }
        Ok(())
    }

    /// Handle an action.
    async fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::RefreshAll => self.refresh_all().await,
            Action::LoadStrategies => self.load_strategies().await,
            Action::SubmitStrategyForm => self.submit_strategy_form().await,
            Action::DeleteSelectedStrategy => self.delete_selected_strategy().await,
            Action::Pay => {
                self.pay();
                Ok(())
            }
            Action::LoadInvoices => self.load_invoices().await,
            Action::NextInvoicePage | Action::PrevInvoicePage => {
                let page = self.store.profile.page;
                self.store.reduce(action);
                if self.store.profile.page != page {
                    self.load_invoices().await?;
                }
                Ok(())
            }
            Action::SaveEmail => self.save_email().await,
            Action::BindUser => {
                self.notify(Notification::info(format!(
                    "Open {} to receive alerts in a private chat",
                    self.config.telegram.bot_link("bind_user")
                )));
                Ok(())
            }
            Action::BindGroup => {
                self.notify(Notification::info(format!(
                    "Open {} to receive alerts in a group",
                    self.config.telegram.bot_link("bind_group")
                )));
                Ok(())
            }
            // Let the store handle the action
            action => self.apply(action),
        }
    }

    /// Reduce an action and bring the navigator in line with the new page.
    fn apply(&mut self, action: Action) -> Result<()> {
        self.store.reduce(action);

        let view = self.store.app.current_view;
        if view == self.navigator.view() {
            return Ok(());
        }
        self.navigator.enter(view, self.store.app.direction)?;

        match view {
            View::Strategies => self.store.dispatch(Action::LoadStrategies)?,
            View::Profile => self.store.dispatch(Action::LoadInvoices)?,
            _ => {}
        }
        Ok(())
    }

    /// Refresh everything the signed-in user sees.
    async fn refresh_all(&mut self) -> Result<()> {
        self.store.reduce(Action::ClearError);
        let Some(token) = self.session.token().map(str::to_owned) else {
            // Signed out: try signing in again.
            return match self.session.restore().await {
                Ok(user) => {
                    self.store.reduce(Action::SessionRestored(user));
                    Ok(())
                }
                Err(e) => {
                    self.report(e);
                    Ok(())
                }
            };
        };

        self.store.reduce(Action::SetLoading(true));
        let client = self.session.client().clone();
        let (page, page_size) = (self.store.profile.page, self.store.profile.page_size);

        // Refresh in parallel
        let (profile, strategies, invoices) = futures::join!(
            self.session.refresh_profile(),
            client.get_strategies(&token),
            client.get_invoices(&token, page, page_size),
        );

        let mut failure = None;
        match profile {
            Ok(user) => self.store.reduce(Action::SessionRestored(Some(user))),
            Err(e) => failure = Some(e),
        }
        match strategies {
            Ok(strategies) => self.store.reduce(Action::StrategiesLoaded(strategies)),
            Err(e) => failure = Some(e),
        }
        match invoices {
            Ok(invoices) => self.store.reduce(Action::InvoicesLoaded(invoices)),
            Err(e) => failure = Some(e),
        }

        self.store.reduce(Action::SetLoading(false));
        match failure {
            Some(e) => self.report(e),
            None => self.notify(Notification::success("Refreshed")),
        }
        Ok(())
    }

    async fn load_strategies(&mut self) -> Result<()> {
        let Some(token) = self.session.token().map(str::to_owned) else {
            self.store.reduce(Action::StrategiesLoaded(Vec::new()));
            return Ok(());
        };
        self.store.reduce(Action::LoadStrategies);

        match self.session.client().get_strategies(&token).await {
            Ok(strategies) => {
                info!(count = strategies.len(), "Loaded strategies");
                self.store.reduce(Action::SetConnected(true));
                self.store.reduce(Action::StrategiesLoaded(strategies));
            }
            Err(e) => self.report(e),
        }
        Ok(())
    }

    async fn submit_strategy_form(&mut self) -> Result<()> {
        let submission = match self.store.strategy_submission() {
            Ok(Some(submission)) => submission,
            Ok(None) => return Ok(()),
            Err(e) => {
                self.notify(Notification::warning(e.to_string()));
                return Ok(());
            }
        };

        let token = match self.session.require_token() {
            Ok(token) => token.to_owned(),
            Err(e) => {
                self.report(e);
                return Ok(());
            }
        };
        let client = self.session.client().clone();

        let result = match &submission {
            Submission::Add(strategy) => client.add_strategy(&token, strategy).await,
            Submission::Update(strategy) => client.update_strategy(&token, strategy).await,
        };
        match result {
            Ok(accepted) => {
                let added = accepted && matches!(submission, Submission::Add(_));
                if accepted {
                    info!(
                        id = submission.strategy().id,
                        symbol = %submission.strategy().symbol,
                        "Strategy saved"
                    );
                }
                self.store.finish_submission(submission, accepted);
                if added {
                    self.store.dispatch(Action::LoadStrategies)?;
                }
            }
            Err(e) => self.report(e),
        }
        Ok(())
    }

    async fn delete_selected_strategy(&mut self) -> Result<()> {
        let Some(id) = self.store.strategies.selected().map(|s| s.id) else {
            return Ok(());
        };
        let token = match self.session.require_token() {
            Ok(token) => token.to_owned(),
            Err(e) => {
                self.report(e);
                return Ok(());
            }
        };

        match self.session.client().delete_strategy(&token, id).await {
            Ok(true) => {
                info!(id, "Strategy deleted");
                self.store.reduce(Action::StrategyDeleted(id));
                self.notify(Notification::success("Strategy deleted"));
            }
            Ok(false) => self.notify(Notification::warning("Failed to delete strategy")),
            Err(e) => self.report(e),
        }
        Ok(())
    }

    /// Start the simulated payment.
    fn pay(&mut self) {
        if self.store.subscription.paying {
            return;
        }
        if !self.store.subscription.can_pay() {
            self.notify(Notification::warning("Select a wallet first"));
            return;
        }
        self.store.reduce(Action::Pay);

        if let (Some(plan), Some(wallet)) = (
            self.store.subscription.plan(),
            self.store.subscription.selected_wallet,
        ) {
            info!(plan = plan.id, wallet = wallet.name(), "Payment started");
        }

        let action_tx = self.store.sender();
        tokio::spawn(async move {
            tokio::time::sleep(PAYMENT_DELAY).await;
            if action_tx.send(Action::PaymentCompleted).is_err() {
                warn!("Action channel closed before payment completed");
            }
        });
    }

    async fn load_invoices(&mut self) -> Result<()> {
        let Some(token) = self.session.token().map(str::to_owned) else {
            self.store.reduce(Action::InvoicesLoaded(Vec::new()));
            return Ok(());
        };
        self.store.reduce(Action::LoadInvoices);

        let (page, page_size) = (self.store.profile.page, self.store.profile.page_size);
        match self
            .session
            .client()
            .get_invoices(&token, page, page_size)
            .await
        {
            Ok(invoices) => {
                debug!(page, count = invoices.len(), "Loaded invoices");
                self.store.reduce(Action::InvoicesLoaded(invoices));
            }
            Err(e) => self.report(e),
        }
        Ok(())
    }

    async fn save_email(&mut self) -> Result<()> {
        let Some(draft) = self.store.profile.email_draft.as_deref() else {
            return Ok(());
        };
        let email = draft.trim().to_string();
        if !email.is_empty() && !email.contains('@') {
            self.notify(Notification::warning("Enter a valid email address"));
            return Ok(());
        }
        let token = match self.session.require_token() {
            Ok(token) => token.to_owned(),
            Err(e) => {
                self.report(e);
                return Ok(());
            }
        };

        match self.session.client().update_email(&token, &email).await {
            Ok(true) => self.store.reduce(Action::EmailSaved(email)),
            Ok(false) => self.notify(Notification::warning("Failed to update email")),
            Err(e) => self.report(e),
        }
        Ok(())
    }

    fn notify(&mut self, notification: Notification) {
        self.store.reduce(Action::ShowNotification(notification));
    }

    /// Surface a failed operation.
    fn report(&mut self, error: Error) {
        warn!("{}", error);
        match error {
            Error::Auth(message) => {
                self.store.reduce(Action::SetLoading(false));
                self.notify(Notification::warning(message));
            }
            error => {
                if error.is_recoverable() {
                    self.store.reduce(Action::SetConnected(false));
                }
                self.store.reduce(Action::SetError(error.to_string()));
            }
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.event_task.abort();

        // Restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}
