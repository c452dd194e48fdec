//! Well-known control and value names used for theme lookups.
//!
//! Lookups are keyed by a `(control, value)` pair of plain strings so that
//! custom controls can introduce their own keys without touching this crate.

/// The window background and the fallback section for every lookup.
pub const WINDOW: &str = "window";
/// Text input control.
pub const INPUT: &str = "input";
/// Scrollbar control.
pub const SCROLL: &str = "scroll";
/// Popup menu.
pub const MENU: &str = "menu";

/// Background fill.
pub const BACKGROUND: &str = "background";
/// Foreground text color.
pub const TEXT: &str = "text";
/// Border color.
pub const BORDER: &str = "border";
/// Border color while focused.
pub const FOCUSED_BORDER: &str = "focused_border";
/// Selection highlight fill.
pub const SELECTION: &str = "selection";
/// Caret color.
pub const CURSOR: &str = "cursor";
/// Text color of disabled controls and menu items.
pub const DISABLED: &str = "disabled";
/// Scrollbar track fill.
pub const SCROLL_BACKGROUND: &str = "scroll_background";
/// Scrollbar slider fill.
pub const SCROLL_SLIDER: &str = "scroll_slider";
/// Scrollbar slider fill while dragged or hovered.
pub const SCROLL_SLIDER_ACTIVE: &str = "scroll_slider_active";
/// Highlighted menu item fill.
pub const MENU_HIGHLIGHT: &str = "highlight";
/// Font used by a control.
pub const FONT: &str = "font";
/// Border width in pixels.
pub const BORDER_WIDTH: &str = "border_width";
/// Inner padding in pixels.
pub const PADDING: &str = "padding";
/// Scrollbar thickness in pixels.
pub const SCROLL_WIDTH: &str = "scroll_width";
/// Menu item height in pixels.
pub const ITEM_HEIGHT: &str = "item_height";
/// Character drawn in place of every character of a password.
pub const PASSWORD_SYMBOL: &str = "password_symbol";
