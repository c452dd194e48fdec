//! The theme, locale and configuration controls are styled with.
//!
//! A [Context] is passed explicitly to windows and from there to every
//! control's `update_theme`. A process-wide default exists only after an
//! explicit [Context::set_default].

use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwapOption;
use wui_theme::config::ThemeConfig;
use wui_theme::locale::Locale;
use wui_theme::theme::Theme;

use crate::config::ToolkitConfig;

static DEFAULT: LazyLock<ArcSwapOption<Context>> = LazyLock::new(|| ArcSwapOption::empty());

/// Shared styling and behaviour settings.
#[derive(Debug, Clone)]
pub struct Context {
    /// The theme.
    pub theme: Arc<Theme>,
    /// The locale.
    pub locale: Arc<Locale>,
    /// Behaviour settings.
    pub config: Arc<ToolkitConfig>,
}

impl Context {
    /// Bundle a theme, locale and configuration.
    pub fn new(theme: Theme, locale: Locale, config: ToolkitConfig) -> Self {
        Self {
            theme: Arc::new(theme),
            locale: Arc::new(locale),
            config: Arc::new(config),
        }
    }

    /// The light theme, English strings and default settings.
    pub fn builtin() -> Self {
        Self::new(Theme::light(), Locale::english(), ToolkitConfig::default())
    }

    /// Build a context from the environment (`WUI_THEME`, `WUI_LOCALE`, `WUI_CONFIG`, ...).
    pub fn from_env() -> Self {
        let (theme, locale) = ThemeConfig::from_env_or_default().resolve();
        Self::new(theme, locale, ToolkitConfig::from_env_or_default())
    }

    /// Replace the theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Arc::new(theme);
        self
    }

    /// Replace the locale.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = Arc::new(locale);
        self
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: ToolkitConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Install `context` as the process-wide default.
    pub fn set_default(context: Context) {
        log::debug!("default context set (theme '{}')", context.theme.name());
        DEFAULT.store(Some(Arc::new(context)));
    }

    /// Remove the process-wide default.
    pub fn clear_default() {
        DEFAULT.store(None);
    }

    /// The process-wide default, if one was installed.
    pub fn current() -> Option<Context> {
        DEFAULT.load_full().map(|context| (*context).clone())
    }

    /// The process-wide default, or [Context::builtin] without installing it.
    pub fn current_or_builtin() -> Context {
        Self::current().unwrap_or_else(Self::builtin)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::current_or_builtin()
    }
}
