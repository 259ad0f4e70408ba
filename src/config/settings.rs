//! Configuration settings for PerpX.

use crate::error::{Error, Result};
use crate::gesture::{FlickConfig, SpringSpec, SwipeConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Prefix of environment overrides, e.g. `PERPX__API__BASE_URL`.
const ENV_PREFIX: &str = "PERPX";
const ENV_SEPARATOR: &str = "__";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API configuration.
    pub api: ApiConfig,
    /// UI configuration.
    pub ui: UiConfig,
    /// Swipe-back gesture tuning.
    pub gesture: GestureConfig,
    /// Telegram launch parameters.
    pub telegram: TelegramConfig,
    /// Key bindings.
    pub keybindings: KeyBindings,
    /// Theme configuration.
    pub theme: ThemeConfig,
}

impl Config {
    /// Load configuration, writing a default file on first run.
    pub fn load_or_default() -> Result<Self> {
        Self::load_or_init(None)
    }

    /// Load configuration, first writing the defaults to `path` if no file
    /// exists there. A failed write only costs the template.
    pub fn load_or_init(path: Option<PathBuf>) -> Result<Self> {
        let config_path = path.unwrap_or_else(default_config_path);
        if !config_path.exists() {
            match Self::default().save(Some(config_path.clone())) {
                Ok(()) => {
                    tracing::info!(path = %config_path.display(), "Wrote default configuration")
                }
                Err(e) => tracing::warn!(
                    path = %config_path.display(),
                    "Could not write default configuration: {e}"
                ),
            }
        }
        Self::load(Some(config_path))
    }

    /// Load configuration from file and environment.
    ///
    /// Sources are layered: built-in defaults, then `config.toml`, then
    /// `PERPX__SECTION__KEY` environment variables.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = path.unwrap_or_else(default_config_path);

        let settings = config::Config::builder()
            .add_source(config::File::from(config_path.as_path()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        tracing::debug!(path = %config_path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = path.unwrap_or_else(default_config_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Reject settings the app cannot run with.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api.base_url)
            .map_err(|e| Error::config(format!("api.base_url '{}': {e}", self.api.base_url)))?;
        if self.api.rate_limit == 0 {
            return Err(Error::config("api.rate_limit must be at least 1"));
        }
        if self.ui.tick_rate_ms == 0 {
            return Err(Error::config("ui.tick_rate_ms must be at least 1"));
        }
        if !(self.gesture.cell_width.is_finite() && self.gesture.cell_width > 0.0) {
            return Err(Error::config("gesture.cell_width must be positive"));
        }
        if !(self.gesture.tension > 0.0 && self.gesture.friction >= 0.0) {
            return Err(Error::config(
                "gesture.tension must be positive and gesture.friction non-negative",
            ));
        }
        self.gesture.swipe_config().validate()?;
        self.gesture.flick_config().validate()
    }
}

fn default_config_path() -> PathBuf {
    super::config_dir()
        .map(|p| p.join("config.toml"))
        .unwrap_or_else(|_| PathBuf::from("config.toml"))
}

/// API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// PerpX backend base URL.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Rate limit (requests per second).
    pub rate_limit: u32,
    /// Serve every call from the in-memory demo backend.
    pub demo: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://perpx-api.bitsflea.com".to_string(),
            timeout_secs: 30,
            rate_limit: 10,
            demo: false,
        }
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Frame interval in milliseconds; animations advance once per tick.
    pub tick_rate_ms: u64,
    /// Enable mouse support. Swipe-back needs it.
    pub mouse_support: bool,
    /// Enable Unicode symbols.
    pub unicode_symbols: bool,
    /// Number of invoices fetched per page.
    pub invoices_per_page: u32,
    /// Show status bar.
    pub show_status_bar: bool,
    /// Show help bar.
    pub show_help_bar: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 16,
            mouse_support: true,
            unicode_symbols: true,
            invoices_per_page: 10,
            show_status_bar: true,
            show_help_bar: true,
        }
    }
}

/// Swipe-back gesture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Largest page offset in pixels.
    pub max_drag: f64,
    /// Rightward travel in pixels past which a release goes back.
    pub trigger_distance: f64,
    /// Pixels represented by one terminal column.
    pub cell_width: f64,
    /// Settle spring tension.
    pub tension: f64,
    /// Settle spring friction.
    pub friction: f64,
    /// Rightward speed in pixels per millisecond that flicks the
    /// subscription page back.
    pub flick_velocity: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            max_drag: 200.0,
            trigger_distance: 100.0,
            cell_width: 8.0,
            tension: 170.0,
            friction: 26.0,
            flick_velocity: 0.3,
        }
    }
}

impl GestureConfig {
    /// Controller configuration for these settings.
    pub fn swipe_config(&self) -> SwipeConfig {
        SwipeConfig {
            max_drag: self.max_drag,
            trigger_distance: self.trigger_distance,
            spring: SpringSpec::from_tension_friction(self.tension, self.friction),
        }
    }

    /// Flick threshold for pages dismissed by velocity.
    pub fn flick_config(&self) -> FlickConfig {
        FlickConfig {
            min_velocity: self.flick_velocity,
        }
    }
}

/// Telegram launch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Mini-app init data used to sign in when no token is stored.
    pub init_data: Option<String>,
    /// Bot that binds alert destinations.
    pub bot_username: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            init_data: None,
            bot_username: "bn_ticker_bot".to_string(),
        }
    }
}

impl TelegramConfig {
    /// Deep link that starts the bot with `payload`.
    pub fn bot_link(&self, payload: &str) -> String {
        format!("https://t.me/{}?start={payload}", self.bot_username)
    }
}

/// Key bindings configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Quit the application.
    pub quit: String,
    /// Show help.
    pub help: String,
    /// Navigate up.
    pub up: String,
    /// Navigate down.
    pub down: String,
    /// Select/confirm.
    pub select: String,
    /// Go back to the menu.
    pub back: String,
    /// Refresh data.
    pub refresh: String,
    /// Add a strategy.
    pub add: String,
    /// Edit the selected strategy or the email.
    pub edit: String,
    /// Delete the selected strategy.
    pub delete: String,
    /// Pay for the selected plan.
    pub pay: String,
    /// Next invoice page.
    pub next_page: String,
    /// Previous invoice page.
    pub prev_page: String,
    /// Bind alerts to a private chat.
    pub bind_user: String,
    /// Bind alerts to a group.
    pub bind_group: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            help: "?".to_string(),
            up: "k".to_string(),
            down: "j".to_string(),
            select: "Enter".to_string(),
            back: "Esc".to_string(),
            refresh: "r".to_string(),
            add: "a".to_string(),
            edit: "e".to_string(),
            delete: "d".to_string(),
            pay: "p".to_string(),
            next_page: "]".to_string(),
            prev_page: "[".to_string(),
            bind_user: "u".to_string(),
            bind_group: "g".to_string(),
        }
    }
}

/// Theme configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Primary color (hex).
    pub primary: String,
    /// Accent color (hex).
    pub accent: String,
    /// Success color (hex).
    pub success: String,
    /// Warning color (hex).
    pub warning: String,
    /// Error color (hex).
    pub error: String,
    /// Muted text color (hex).
    pub muted: String,
    /// Border color (hex).
    pub border: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary: "#22c55e".to_string(),
            accent: "#10b981".to_string(),
            success: "#66bb6a".to_string(),
            warning: "#ffa726".to_string(),
            error: "#ef5350".to_string(),
            muted: "#94a3b8".to_string(),
            border: "#45475a".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("perpx-config-{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.base_url, "https://perpx-api.bitsflea.com");
        assert_eq!(config.gesture.swipe_config().max_drag, 200.0);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load(Some(temp_path("absent.toml"))).unwrap();
        assert_eq!(config.ui.invoices_per_page, 10);
        assert!(!config.api.demo);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("config.toml");
        let mut config = Config::default();
        config.api.demo = true;
        config.gesture.trigger_distance = 80.0;
        config.telegram.init_data = Some("query_id=abc".to_string());
        config.save(Some(path.clone())).unwrap();

        let loaded = Config::load(Some(path.clone())).unwrap();
        assert!(loaded.api.demo);
        assert_eq!(loaded.gesture.trigger_distance, 80.0);
        assert_eq!(loaded.telegram.init_data.as_deref(), Some("query_id=abc"));

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_first_run_writes_defaults() {
        let path = temp_path("config.toml");
        assert!(!path.exists());

        let config = Config::load_or_init(Some(path.clone())).unwrap();
        assert!(path.exists());
        assert_eq!(config.gesture.flick_velocity, 0.3);

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[gesture]"));
        assert!(written.contains("bot_username = \"bn_ticker_bot\""));

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_existing_file_is_kept() {
        let path = temp_path("config.toml");
        let mut config = Config::default();
        config.ui.invoices_per_page = 25;
        config.save(Some(path.clone())).unwrap();

        let loaded = Config::load_or_init(Some(path.clone())).unwrap();
        assert_eq!(loaded.ui.invoices_per_page, 25);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_invalid_gesture_rejected() {
        let mut config = Config::default();
        config.gesture.trigger_distance = 300.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.gesture.cell_width = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.gesture.flick_velocity = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bot_link() {
        let telegram = TelegramConfig::default();
        assert_eq!(
            telegram.bot_link("bind_group"),
            "https://t.me/bn_ticker_bot?start=bind_group"
        );
    }
}
