//! Colors resolved from the theme configuration.

use crate::config::ThemeConfig;
use ratatui::style::Color;
use std::str::FromStr;

/// Resolved UI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub primary: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub muted: Color,
    pub border: Color,
}

impl Theme {
    /// Resolve the configured colors, keeping the built-in color for any
    /// entry that does not parse.
    pub fn from_config(config: &ThemeConfig) -> Self {
        let defaults = ThemeConfig::default();
        let pick = |value: &str, fallback: &str, name: &str| {
            Color::from_str(value).unwrap_or_else(|_| {
                tracing::warn!(name, value, "Invalid theme color, using default");
                Color::from_str(fallback).unwrap_or(Color::Reset)
            })
        };

        Self {
            primary: pick(&config.primary, &defaults.primary, "primary"),
            accent: pick(&config.accent, &defaults.accent, "accent"),
            success: pick(&config.success, &defaults.success, "success"),
            warning: pick(&config.warning, &defaults.warning, "warning"),
            error: pick(&config.error, &defaults.error, "error"),
            muted: pick(&config.muted, &defaults.muted, "muted"),
            border: pick(&config.border, &defaults.border, "border"),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}
