//! Font descriptors handed to text measurement and drawing.

use bitflags::bitflags;

bitflags! {
    /// Text decorations applied on top of a font face.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Decorations: u8 {
        /// Bold weight.
        const BOLD = 1 << 0;
        /// Italic style.
        const ITALIC = 1 << 1;
        /// Underlined text.
        const UNDERLINE = 1 << 2;
        /// Struck-out text.
        const STRIKEOUT = 1 << 3;
    }
}

/// A font face name, a pixel size and a set of decorations.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    /// Family name, e.g. `"Sans"`.
    pub name: String,
    /// Size in pixels.
    pub size: f64,
    /// Decorations.
    pub decorations: Decorations,
}

impl Font {
    /// Create a plain font.
    pub fn new(name: impl Into<String>, size: f64) -> Self {
        Self {
            name: name.into(),
            size,
            decorations: Decorations::empty(),
        }
    }

    /// Replace the decorations.
    pub fn with_decorations(mut self, decorations: Decorations) -> Self {
        self.decorations = decorations;
        self
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("Sans", 14.0)
    }
}
