//! # Toolkit Configuration
//!
//! Timing and behaviour knobs shared by every control.
//!
//! ## Environment Variables
//!
//! - `WUI_CONFIG`: path to a TOML file
//! - `WUI_CURSOR_BLINK_MS`: caret blink period
//! - `WUI_AUTOSCROLL_MS`: drag-selection auto-scroll period
//!
//! ## Configuration File Format
//!
//! ```toml
//! cursor_blink_ms = 500
//! autoscroll_ms = 40
//! double_click_ms = 400
//! wheel_lines = 3
//! scroll_step = 16.0
//! cursor_margin = 10.0
//! ```

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use wui_theme::error::{Error, Result};

/// Behaviour settings for controls and windows.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToolkitConfig {
    /// Caret blink half-period in milliseconds. `0` disables blinking.
    pub cursor_blink_ms: u64,
    /// Interval of the drag-selection auto-scroll timer in milliseconds.
    pub autoscroll_ms: u64,
    /// Maximum delay between two clicks of a double click in milliseconds.
    pub double_click_ms: u64,
    /// Lines scrolled per wheel notch.
    pub wheel_lines: u32,
    /// Pixels scrolled by a scrollbar arrow or wheel step.
    pub scroll_step: f64,
    /// Look-ahead margin kept right of the caret when scrolling horizontally.
    pub cursor_margin: f64,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            cursor_blink_ms: 500,
            autoscroll_ms: 40,
            double_click_ms: 400,
            wheel_lines: 3,
            scroll_step: 16.0,
            cursor_margin: 10.0,
        }
    }
}

impl ToolkitConfig {
    /// Caret blink period.
    pub fn cursor_blink(&self) -> Option<Duration> {
        (self.cursor_blink_ms > 0).then(|| Duration::from_millis(self.cursor_blink_ms))
    }

    /// Auto-scroll period, never shorter than one millisecond.
    pub fn autoscroll(&self) -> Duration {
        Duration::from_millis(self.autoscroll_ms.max(1))
    }

    /// Double click window.
    pub fn double_click(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }

    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::from_io("config", e))?;
        Self::from_toml_str(&content)
    }

    /// Parse settings from TOML content. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Build settings from `WUI_CONFIG`, `WUI_CURSOR_BLINK_MS` and `WUI_AUTOSCROLL_MS`.
    pub fn from_env_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(path) = env::var("WUI_CONFIG") {
            match Self::from_file(&path) {
                Ok(file_config) => config = file_config,
                Err(err) => log::warn!("ignoring config {}: {}", path, err),
            }
        }

        if let Some(ms) = Self::env_millis("WUI_CURSOR_BLINK_MS") {
            config.cursor_blink_ms = ms;
        }
        if let Some(ms) = Self::env_millis("WUI_AUTOSCROLL_MS") {
            config.autoscroll_ms = ms;
        }

        config
    }

    fn env_millis(name: &str) -> Option<u64> {
        let value = env::var(name).ok()?;
        match value.trim().parse() {
            Ok(ms) => Some(ms),
            Err(_) => {
                log::warn!("{} is not a number: '{}'", name, value);
                None
            },
        }
    }

    fn validate(&self) -> Result<()> {
        if self.scroll_step <= 0.0 {
            return Err(Error::invalid_value("config", "scroll_step must be positive"));
        }
        if self.cursor_margin < 0.0 {
            return Err(Error::invalid_value("config", "cursor_margin must not be negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wui_theme::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let config = ToolkitConfig::default();
        assert_eq!(config.autoscroll(), Duration::from_millis(40));
        assert_eq!(config.cursor_blink(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_partial_toml() {
        let config = ToolkitConfig::from_toml_str("cursor_blink_ms = 0\nwheel_lines = 5").unwrap();
        assert_eq!(config.cursor_blink(), None);
        assert_eq!(config.wheel_lines, 5);
        assert_eq!(config.double_click_ms, 400);
    }

    #[test]
    fn test_invalid_values() {
        let err = ToolkitConfig::from_toml_str("scroll_step = -1.0").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidValue);

        let err = ToolkitConfig::from_toml_str("wheel_lines = \"many\"").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidJson);
    }
}
