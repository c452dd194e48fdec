//! # Theme Configuration
//!
//! Selects the built-in theme and locale an application starts with.
//!
//! ## Environment Variables
//!
//! - `WUI_THEME`: `light` or `dark`
//! - `WUI_LOCALE`: `en` or `ru`
//! - `WUI_THEME_CONFIG`: path to a TOML file, applied before the variables above
//!
//! ## Configuration File Format
//!
//! ```toml
//! [theme]
//! default = "dark"
//! locale = "ru"
//! ```

use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::locale::Locale;
use crate::theme::Theme;

/// A built-in theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeSource {
    /// [Theme::light].
    #[default]
    Light,
    /// [Theme::dark].
    Dark,
}

/// A built-in locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum LocaleSource {
    /// [Locale::english].
    #[default]
    #[serde(rename = "en")]
    English,
    /// [Locale::russian].
    #[serde(rename = "ru")]
    Russian,
}

/// Theme and locale selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThemeConfig {
    /// The theme to use.
    pub theme: ThemeSource,
    /// The locale to use.
    pub locale: LocaleSource,
}

#[derive(Deserialize)]
struct ConfigFile {
    theme: Option<ThemeSection>,
}

#[derive(Deserialize)]
struct ThemeSection {
    default: Option<ThemeSource>,
    locale: Option<LocaleSource>,
}

impl ThemeConfig {
    /// Create a configuration with the light theme and English strings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: ThemeSource) -> Self {
        self.theme = theme;
        self
    }

    /// Set the locale.
    pub fn with_locale(mut self, locale: LocaleSource) -> Self {
        self.locale = locale;
        self
    }

    /// Build a configuration from `WUI_THEME_CONFIG`, `WUI_THEME` and `WUI_LOCALE`.
    ///
    /// Unknown values and unreadable files are logged and ignored.
    pub fn from_env_or_default() -> Self {
        let mut config = Self::new();

        if let Ok(path) = env::var("WUI_THEME_CONFIG") {
            match Self::from_file(&path) {
                Ok(file_config) => config = file_config,
                Err(err) => log::warn!("ignoring theme config {}: {}", path, err),
            }
        }

        if let Ok(theme) = env::var("WUI_THEME") {
            match Self::parse_theme_source(&theme) {
                Some(source) => config.theme = source,
                None => log::warn!("unknown WUI_THEME value '{}'", theme),
            }
        }

        if let Ok(locale) = env::var("WUI_LOCALE") {
            match Self::parse_locale_source(&locale) {
                Some(source) => config.locale = source,
                None => log::warn!("unknown WUI_LOCALE value '{}'", locale),
            }
        }

        config
    }

    /// Load a configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::from_io("theme config", e))?;
        Self::from_toml_str(&content)
    }

    /// Parse a configuration from TOML content.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| Error::invalid_json("theme config", e.to_string()))?;
        let mut config = Self::new();
        if let Some(section) = file.theme {
            if let Some(theme) = section.default {
                config.theme = theme;
            }
            if let Some(locale) = section.locale {
                config.locale = locale;
            }
        }
        Ok(config)
    }

    /// Parse a theme name.
    pub fn parse_theme_source(s: &str) -> Option<ThemeSource> {
        match s.trim().to_lowercase().as_str() {
            "light" => Some(ThemeSource::Light),
            "dark" => Some(ThemeSource::Dark),
            _ => None,
        }
    }

    /// Parse a locale name.
    pub fn parse_locale_source(s: &str) -> Option<LocaleSource> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Some(LocaleSource::English),
            "ru" | "russian" => Some(LocaleSource::Russian),
            _ => None,
        }
    }

    /// Build the selected theme and locale.
    pub fn resolve(&self) -> (Theme, Locale) {
        let theme = match self.theme {
            ThemeSource::Light => Theme::light(),
            ThemeSource::Dark => Theme::dark(),
        };
        let locale = match self.locale {
            LocaleSource::English => Locale::english(),
            LocaleSource::Russian => Locale::russian(),
        };
        (theme, locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_from_toml() {
        let config = ThemeConfig::from_toml_str(
            r#"
            [theme]
            default = "dark"
            locale = "ru"
            "#,
        )
        .unwrap();
        assert_eq!(config.theme, ThemeSource::Dark);
        assert_eq!(config.locale, LocaleSource::Russian);

        let (theme, locale) = config.resolve();
        assert_eq!(theme.name(), "dark");
        assert_eq!(locale.name(), "ru");
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(ThemeConfig::from_toml_str("").unwrap(), ThemeConfig::default());
    }

    #[test]
    fn test_bad_toml() {
        let err = ThemeConfig::from_toml_str("[theme]\ndefault = \"neon\"").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidJson);
    }

    #[test]
    fn test_missing_file() {
        let err = ThemeConfig::from_file("/nonexistent/wui/theme.toml").unwrap_err();
        assert_eq!(err.kind, ErrorKind::FileNotFound);
    }

    #[test]
    fn test_parse_sources() {
        assert_eq!(ThemeConfig::parse_theme_source(" Dark "), Some(ThemeSource::Dark));
        assert_eq!(ThemeConfig::parse_theme_source("sweet"), None);
        assert_eq!(ThemeConfig::parse_locale_source("english"), Some(LocaleSource::English));
    }
}
