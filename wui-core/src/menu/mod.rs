//! Popup menu model and overlay.

/// Command identifiers.
pub mod commands;
/// The popup overlay.
pub mod popup;
/// Items, templates and edit command initialization.
pub mod template;

pub use commands::MenuCommand;
pub use popup::{MenuPopup, PopupResponse};
pub use template::{init_edit_commands, MenuContext, MenuItem, MenuTemplate};
