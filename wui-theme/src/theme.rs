//! # Theme Lookup
//!
//! A [Theme] is a two level table: control name → value name → [ThemeValue].
//! Controls never hold colors themselves; they ask the theme during
//! `update_theme` and cache what they need.
//!
//! Missing values fall back to the same value of the `"window"` section and
//! then to a neutral default, so a partial theme never breaks drawing.

use indexmap::IndexMap;
use vello::peniko::Color;

use crate::font::Font;
use crate::properties::*;

/// A single themed value.
#[derive(Debug, Clone, PartialEq)]
pub enum ThemeValue {
    /// A color.
    Color(Color),
    /// A length in pixels.
    Dimension(f64),
    /// A font descriptor.
    Font(Font),
    /// Free-form text.
    String(String),
}

/// A named set of themed values.
#[derive(Debug, Clone)]
pub struct Theme {
    name: String,
    sections: IndexMap<String, IndexMap<String, ThemeValue>>,
}

impl Theme {
    /// Create an empty theme.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sections: IndexMap::new(),
        }
    }

    /// The theme name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store a value.
    pub fn set(&mut self, control: &str, value: &str, v: ThemeValue) {
        self.sections
            .entry(control.to_string())
            .or_default()
            .insert(value.to_string(), v);
    }

    /// Store a color.
    pub fn set_color(&mut self, control: &str, value: &str, color: Color) {
        self.set(control, value, ThemeValue::Color(color));
    }

    /// Store a dimension.
    pub fn set_dimension(&mut self, control: &str, value: &str, dimension: f64) {
        self.set(control, value, ThemeValue::Dimension(dimension));
    }

    /// Store a font.
    pub fn set_font(&mut self, control: &str, value: &str, font: Font) {
        self.set(control, value, ThemeValue::Font(font));
    }

    /// Store a string.
    pub fn set_string(&mut self, control: &str, value: &str, s: impl Into<String>) {
        self.set(control, value, ThemeValue::String(s.into()));
    }

    /// Whether the control section defines the value (no fallback).
    pub fn has(&self, control: &str, value: &str) -> bool {
        self.sections
            .get(control)
            .is_some_and(|section| section.contains_key(value))
    }

    fn lookup(&self, control: &str, value: &str) -> Option<&ThemeValue> {
        self.sections
            .get(control)
            .and_then(|section| section.get(value))
            .or_else(|| self.sections.get(WINDOW).and_then(|section| section.get(value)))
    }

    /// Look up a color.
    pub fn color_of(&self, control: &str, value: &str) -> Color {
        match self.lookup(control, value) {
            Some(ThemeValue::Color(color)) => *color,
            _ => {
                log::debug!("theme '{}': no color {}.{}", self.name, control, value);
                Color::BLACK
            },
        }
    }

    /// Look up a dimension.
    pub fn dimension_of(&self, control: &str, value: &str) -> f64 {
        match self.lookup(control, value) {
            Some(ThemeValue::Dimension(d)) => *d,
            _ => {
                log::debug!("theme '{}': no dimension {}.{}", self.name, control, value);
                0.0
            },
        }
    }

    /// Look up a font.
    pub fn font_of(&self, control: &str, value: &str) -> Font {
        match self.lookup(control, value) {
            Some(ThemeValue::Font(font)) => font.clone(),
            _ => {
                log::debug!("theme '{}': no font {}.{}", self.name, control, value);
                Font::default()
            },
        }
    }

    /// Look up a string.
    pub fn string_of(&self, control: &str, value: &str) -> String {
        match self.lookup(control, value) {
            Some(ThemeValue::String(s)) => s.clone(),
            _ => {
                log::debug!("theme '{}': no string {}.{}", self.name, control, value);
                String::new()
            },
        }
    }

    /// The built-in light theme.
    pub fn light() -> Self {
        let mut theme = Self::new("light");
        theme.fill_common();

        theme.set_color(WINDOW, BACKGROUND, Color::from_rgb8(240, 240, 240));
        theme.set_color(WINDOW, TEXT, Color::from_rgb8(20, 20, 20));
        theme.set_color(WINDOW, BORDER, Color::from_rgb8(160, 160, 160));
        theme.set_color(WINDOW, FOCUSED_BORDER, Color::from_rgb8(38, 120, 216));
        theme.set_color(WINDOW, DISABLED, Color::from_rgb8(150, 150, 150));

        theme.set_color(INPUT, BACKGROUND, Color::WHITE);
        theme.set_color(INPUT, SELECTION, Color::from_rgb8(173, 206, 250));
        theme.set_color(INPUT, CURSOR, Color::from_rgb8(20, 20, 20));
        theme.set_color(INPUT, SCROLL_BACKGROUND, Color::from_rgb8(232, 232, 232));
        theme.set_color(INPUT, SCROLL_SLIDER, Color::from_rgb8(190, 190, 190));
        theme.set_color(INPUT, SCROLL_SLIDER_ACTIVE, Color::from_rgb8(140, 140, 140));

        theme.set_color(SCROLL, SCROLL_BACKGROUND, Color::from_rgb8(232, 232, 232));
        theme.set_color(SCROLL, SCROLL_SLIDER, Color::from_rgb8(190, 190, 190));
        theme.set_color(SCROLL, SCROLL_SLIDER_ACTIVE, Color::from_rgb8(140, 140, 140));

        theme.set_color(MENU, BACKGROUND, Color::from_rgb8(250, 250, 250));
        theme.set_color(MENU, MENU_HIGHLIGHT, Color::from_rgb8(210, 228, 250));
        theme
    }

    /// The built-in dark theme.
    pub fn dark() -> Self {
        let mut theme = Self::new("dark");
        theme.fill_common();

        theme.set_color(WINDOW, BACKGROUND, Color::from_rgb8(37, 37, 38));
        theme.set_color(WINDOW, TEXT, Color::from_rgb8(230, 230, 230));
        theme.set_color(WINDOW, BORDER, Color::from_rgb8(80, 80, 84));
        theme.set_color(WINDOW, FOCUSED_BORDER, Color::from_rgb8(0, 122, 204));
        theme.set_color(WINDOW, DISABLED, Color::from_rgb8(110, 110, 110));

        theme.set_color(INPUT, BACKGROUND, Color::from_rgb8(30, 30, 30));
        theme.set_color(INPUT, SELECTION, Color::from_rgb8(38, 79, 120));
        theme.set_color(INPUT, CURSOR, Color::from_rgb8(230, 230, 230));
        theme.set_color(INPUT, SCROLL_BACKGROUND, Color::from_rgb8(45, 45, 48));
        theme.set_color(INPUT, SCROLL_SLIDER, Color::from_rgb8(85, 85, 90));
        theme.set_color(INPUT, SCROLL_SLIDER_ACTIVE, Color::from_rgb8(120, 120, 126));

        theme.set_color(SCROLL, SCROLL_BACKGROUND, Color::from_rgb8(45, 45, 48));
        theme.set_color(SCROLL, SCROLL_SLIDER, Color::from_rgb8(85, 85, 90));
        theme.set_color(SCROLL, SCROLL_SLIDER_ACTIVE, Color::from_rgb8(120, 120, 126));

        theme.set_color(MENU, BACKGROUND, Color::from_rgb8(45, 45, 48));
        theme.set_color(MENU, MENU_HIGHLIGHT, Color::from_rgb8(9, 71, 113));
        theme
    }

    fn fill_common(&mut self) {
        self.set_font(WINDOW, FONT, Font::default());
        self.set_dimension(WINDOW, BORDER_WIDTH, 1.0);
        self.set_dimension(WINDOW, PADDING, 4.0);
        self.set_dimension(SCROLL, SCROLL_WIDTH, 14.0);
        self.set_dimension(INPUT, SCROLL_WIDTH, 14.0);
        self.set_dimension(MENU, ITEM_HEIGHT, 22.0);
        self.set_dimension(MENU, PADDING, 8.0);
        self.set_string(INPUT, PASSWORD_SYMBOL, "*");
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
