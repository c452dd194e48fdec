#![warn(missing_docs)]

//! A small native widget toolkit: windows with event dispatch and focus
//! handling, a multi-line text input and scrollbars.

pub use nalgebra as math;
pub use vello::peniko as color;

pub use wui_controls as controls;
pub use wui_core as core;
pub use wui_theme as theme;

/// A "prelude" for users of the wui toolkit.
///
/// Importing this module brings into scope the most common types
/// needed to build a window with controls.
///
/// ```rust
/// use wui::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::clipboard::{Clipboard, MemoryClipboard};
    pub use crate::core::config::ToolkitConfig;
    pub use crate::core::context::Context;
    pub use crate::core::control::{Control, ControlId, EventContext};
    pub use crate::core::event::{Event, EventType, Key, Modifiers, MouseEventKind};
    pub use crate::core::graphics::{FixedMeasure, RecordingSurface, Surface, TextMeasure};
    pub use crate::core::window::Window;
    pub use crate::core::{Error, ErrorKind, Point, Rect, Result, Size};

    pub use crate::theme::config::ThemeConfig;
    pub use crate::theme::locale::Locale;
    pub use crate::theme::theme::Theme;

    // Math
    pub use nalgebra::Vector2;

    // Color
    pub use vello::peniko::Color;

    // Controls
    pub use crate::controls::buffer::{Selection, TextBuffer, TextPosition};
    pub use crate::controls::input::{Input, InputContent, InputView};
    pub use crate::controls::scroll::{Orientation, ScrollChange, ScrollState, Scrollbar};
}
