//! TUI widgets.

mod help;
mod menu;
mod notifications;
mod page_header;
mod placeholder;
mod profile;
mod status_bar;
mod strategy_form;
mod strategy_list;
mod subscription;

pub use help::HelpPanel;
pub use menu::Menu;
pub use notifications::{render_error, render_notification};
pub use page_header::PageHeader;
pub use placeholder::Placeholder;
pub use profile::ProfilePage;
pub use status_bar::StatusBar;
pub use strategy_form::StrategyFormPopup;
pub use strategy_list::StrategyList;
pub use subscription::SubscriptionPage;
