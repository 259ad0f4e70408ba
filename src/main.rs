//! PerpX - A terminal client for the PerpX strategy alert service
//!
//! Manage alert strategies, subscriptions and your profile from the
//! terminal, with swipe-back page navigation driven by the mouse.

use anyhow::Context;
use perpx::{App, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log to a file; the terminal belongs to the UI
    let log_dir = perpx::config::log_dir().context("Failed to resolve log directory")?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, "perpx.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "perpx=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false),
        )
        .init();

    // Load configuration
    let config = Config::load_or_default().context("Failed to load configuration")?;
    tracing::info!(base_url = %config.api.base_url, demo = config.api.demo, "Starting PerpX");

    // Run the application
    let mut app = App::new(config)
        .await
        .context("Failed to start the terminal UI")?;
    app.run().await.context("Application error")?;

    Ok(())
}
