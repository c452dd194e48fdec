//! Menu items, templates and context-aware initialization.

use crate::menu::commands::MenuCommand;

/// A single entry of a popup menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    /// Command delivered to the owner when the item is chosen.
    pub id: MenuCommand,
    /// Display label.
    pub label: String,
    /// Optional keyboard shortcut text (e.g., "Ctrl+C")
    pub shortcut: Option<String>,
    /// Whether the item can be chosen.
    pub enabled: bool,
}

impl MenuItem {
    /// Create a new menu item with a command ID and label
    pub fn new(id: MenuCommand, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            shortcut: None,
            enabled: true,
        }
    }

    /// Create a separator item
    pub fn separator() -> Self {
        Self {
            id: MenuCommand::Custom(MenuCommand::SEPARATOR),
            label: "---".to_string(),
            shortcut: None,
            enabled: false,
        }
    }

    /// Check if this is a separator
    pub fn is_separator(&self) -> bool {
        matches!(self.id, MenuCommand::Custom(MenuCommand::SEPARATOR))
    }

    /// Set the keyboard shortcut
    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    /// Set enabled state
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// An ordered list of menu items.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MenuTemplate {
    /// Template identifier.
    pub id: String,
    /// Menu items in this template.
    pub items: Vec<MenuItem>,
}

impl MenuTemplate {
    /// Create an empty template.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            items: Vec::new(),
        }
    }

    /// Add a menu item to this template
    pub fn add_item(mut self, item: MenuItem) -> Self {
        self.items.push(item);
        self
    }

    /// Find an item by command.
    pub fn find_item(&self, id: MenuCommand) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Find an item by command, mutably.
    pub fn find_item_mut(&mut self, id: MenuCommand) -> Option<&mut MenuItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }
}

/// The state edit commands depend on, captured when a menu opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuContext {
    /// Number of selected characters.
    pub selection_count: usize,
    /// Whether the selection may be copied (false for masked text).
    pub can_copy: bool,
    /// Whether the selection may be removed (false for read-only text).
    pub can_move: bool,
    /// Whether pasting is possible (editable target and text on the clipboard).
    pub can_paste: bool,
}

/// Enable or disable Cut, Copy, Paste and Select all based on `context`.
pub fn init_edit_commands(template: &mut MenuTemplate, context: &MenuContext) {
    if let Some(item) = template.find_item_mut(MenuCommand::EditCut) {
        item.enabled = context.can_move && context.can_copy && context.selection_count > 0;
    }

    if let Some(item) = template.find_item_mut(MenuCommand::EditCopy) {
        item.enabled = context.can_copy && context.selection_count > 0;
    }

    if let Some(item) = template.find_item_mut(MenuCommand::EditPaste) {
        item.enabled = context.can_paste;
    }

    if let Some(item) = template.find_item_mut(MenuCommand::EditSelectAll) {
        item.enabled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit_menu() -> MenuTemplate {
        MenuTemplate::new("edit")
            .add_item(MenuItem::new(MenuCommand::EditCut, "Cut"))
            .add_item(MenuItem::new(MenuCommand::EditCopy, "Copy"))
            .add_item(MenuItem::new(MenuCommand::EditPaste, "Paste"))
            .add_item(MenuItem::separator())
            .add_item(MenuItem::new(MenuCommand::EditSelectAll, "Select all"))
    }

    fn enabled(template: &MenuTemplate, id: MenuCommand) -> bool {
        template.find_item(id).map(|item| item.enabled).unwrap_or(false)
    }

    #[test]
    fn test_no_selection() {
        let mut template = edit_menu();
        init_edit_commands(
            &mut template,
            &MenuContext {
                selection_count: 0,
                can_copy: true,
                can_move: true,
                can_paste: true,
            },
        );
        assert!(!enabled(&template, MenuCommand::EditCut));
        assert!(!enabled(&template, MenuCommand::EditCopy));
        assert!(enabled(&template, MenuCommand::EditPaste));
    }

    #[test]
    fn test_masked_selection() {
        let mut template = edit_menu();
        init_edit_commands(
            &mut template,
            &MenuContext {
                selection_count: 4,
                can_copy: false,
                can_move: true,
                can_paste: false,
            },
        );
        assert!(!enabled(&template, MenuCommand::EditCut));
        assert!(!enabled(&template, MenuCommand::EditCopy));
        assert!(!enabled(&template, MenuCommand::EditPaste));
        assert!(enabled(&template, MenuCommand::EditSelectAll));
    }

    #[test]
    fn test_separator() {
        let template = edit_menu();
        assert_eq!(template.items.iter().filter(|item| item.is_separator()).count(), 1);
    }
}
