//! Translated user-visible strings, looked up by `(section, key)`.

use indexmap::IndexMap;

/// A set of translations.
#[derive(Debug, Clone)]
pub struct Locale {
    name: String,
    sections: IndexMap<String, IndexMap<String, String>>,
}

impl Locale {
    /// Create an empty locale.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sections: IndexMap::new(),
        }
    }

    /// The locale name, e.g. `"en"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store a translation.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    /// Translate a key. Missing keys translate to themselves.
    pub fn translate(&self, section: &str, key: &str) -> String {
        match self.sections.get(section).and_then(|s| s.get(key)) {
            Some(value) => value.clone(),
            None => {
                log::debug!("locale '{}': no translation for {}.{}", self.name, section, key);
                key.to_string()
            },
        }
    }

    /// Built-in English strings.
    pub fn english() -> Self {
        let mut locale = Self::new("en");
        locale.set("input", "cut", "Cut");
        locale.set("input", "copy", "Copy");
        locale.set("input", "paste", "Paste");
        locale.set("input", "select_all", "Select all");
        locale
    }

    /// Built-in Russian strings.
    pub fn russian() -> Self {
        let mut locale = Self::new("ru");
        locale.set("input", "cut", "Вырезать");
        locale.set("input", "copy", "Копировать");
        locale.set("input", "paste", "Вставить");
        locale.set("input", "select_all", "Выделить всё");
        locale
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate() {
        assert_eq!(Locale::english().translate("input", "paste"), "Paste");
        assert_eq!(Locale::russian().translate("input", "copy"), "Копировать");
    }

    #[test]
    fn test_missing_key_returns_key() {
        assert_eq!(Locale::english().translate("input", "undo"), "undo");
        assert_eq!(Locale::new("xx").translate("menu", "open"), "open");
    }
}
