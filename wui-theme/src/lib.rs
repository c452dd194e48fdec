#![warn(missing_docs)]

//! # wui Theming System
//!
//! Themes, fonts and locales for the wui toolkit.
//!
//! - **[Theme](theme::Theme)**: color, dimension, font and string lookup by `(control, value)`
//! - **[Locale](locale::Locale)**: translated strings by `(section, key)`
//! - **[ThemeConfig](config::ThemeConfig)**: picks a built-in theme and locale from env vars or TOML
//! - **[Error](error::Error)**: the error type shared by every wui crate
//!
//! ```rust
//! use wui_theme::properties::{BACKGROUND, INPUT};
//! use wui_theme::theme::Theme;
//!
//! let theme = Theme::dark();
//! let background = theme.color_of(INPUT, BACKGROUND);
//! # let _ = background;
//! ```

/// Theme and locale selection.
pub mod config;
/// Error types.
pub mod error;
/// Font descriptors.
pub mod font;
/// Translations.
pub mod locale;
/// Well-known lookup keys.
pub mod properties;
/// Theme lookup.
pub mod theme;

pub use vello::peniko::Color;
