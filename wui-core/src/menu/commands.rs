//! Menu command IDs - enum for standard edit commands and u32 for custom extensions

use std::fmt;

/// Menu command identifier.
/// Standard commands use typed variants, while custom commands use u32 values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuCommand {
    /// Cut the selection to the clipboard.
    EditCut,
    /// Copy the selection to the clipboard.
    EditCopy,
    /// Paste clipboard text.
    EditPaste,
    /// Select everything.
    EditSelectAll,
    /// Custom command (0x1000+ range for extensions).
    Custom(u32),
}

impl MenuCommand {
    /// First ID for custom commands (extensions should use 0x1000+)
    pub const CUSTOM_FIRST: u32 = 0x1000;

    /// ID reserved for separators.
    pub const SEPARATOR: u32 = 0xFFFF;
}

impl fmt::Display for MenuCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuCommand::EditCut => write!(f, "EditCut"),
            MenuCommand::EditCopy => write!(f, "EditCopy"),
            MenuCommand::EditPaste => write!(f, "EditPaste"),
            MenuCommand::EditSelectAll => write!(f, "EditSelectAll"),
            MenuCommand::Custom(id) => write!(f, "Custom({:#x})", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(MenuCommand::EditCopy.to_string(), "EditCopy");
        assert_eq!(MenuCommand::Custom(0x1001).to_string(), "Custom(0x1001)");
    }
}
