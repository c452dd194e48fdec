//! Clipboard access.
//!
//! Controls reach the clipboard through [EventContext::clipboard](crate::control::EventContext::clipboard).
//! The platform implementation is [SystemClipboard]; [MemoryClipboard] keeps
//! the text in process and is what headless windows use.

use std::cell::RefCell;
use std::rc::Rc;

use wui_theme::error::{Error, Result};

use crate::utf8;

/// A text clipboard.
pub trait Clipboard {
    /// Replace the clipboard content with `text`.
    fn put_text(&mut self, text: &str) -> Result<()>;

    /// Whether the clipboard currently holds text.
    fn has_text(&mut self) -> bool;

    /// The clipboard text, if any.
    fn get_text(&mut self) -> Option<String>;
}

/// An in-process clipboard.
///
/// Clones share the same content, so a test can keep a handle while the
/// window owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    content: Rc<RefCell<Option<String>>>,
}

impl MemoryClipboard {
    /// Create an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw bytes coming from a foreign source.
    ///
    /// Bytes that are not valid UTF-8 are rejected and leave the clipboard
    /// without text.
    pub fn put_bytes(&self, bytes: &[u8]) -> Result<()> {
        match utf8::validate(bytes) {
            Some(text) => {
                *self.content.borrow_mut() = Some(text.to_string());
                Ok(())
            },
            None => {
                *self.content.borrow_mut() = None;
                Err(Error::invalid_value("clipboard", "data is not valid UTF-8"))
            },
        }
    }

    /// Drop the content.
    pub fn clear(&self) {
        *self.content.borrow_mut() = None;
    }

    /// A copy of the current text.
    pub fn text(&self) -> Option<String> {
        self.content.borrow().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn put_text(&mut self, text: &str) -> Result<()> {
        *self.content.borrow_mut() = Some(text.to_string());
        Ok(())
    }

    fn has_text(&mut self) -> bool {
        self.content.borrow().is_some()
    }

    fn get_text(&mut self) -> Option<String> {
        self.text()
    }
}

/// The platform clipboard.
#[cfg(feature = "system-clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    /// Open the platform clipboard.
    pub fn new() -> Result<Self> {
        let inner = arboard::Clipboard::new().map_err(|e| Error::no_handle("clipboard", e.to_string()))?;
        Ok(Self { inner })
    }
}

#[cfg(feature = "system-clipboard")]
impl Clipboard for SystemClipboard {
    fn put_text(&mut self, text: &str) -> Result<()> {
        self.inner
            .set_text(text.to_string())
            .map_err(|e| Error::system_error("clipboard", e.to_string()))
    }

    fn has_text(&mut self) -> bool {
        self.inner.get_text().is_ok()
    }

    fn get_text(&mut self) -> Option<String> {
        match self.inner.get_text() {
            Ok(text) => Some(text),
            Err(arboard::Error::ContentNotAvailable) => None,
            Err(err) => {
                log::warn!("failed to read clipboard: {}", err);
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wui_theme::error::ErrorKind;

    #[test]
    fn test_clones_share_content() {
        let shared = MemoryClipboard::new();
        let mut owned = shared.clone();
        assert!(!owned.has_text());
        owned.put_text("hello").unwrap();
        assert_eq!(shared.text().as_deref(), Some("hello"));
    }

    #[test]
    fn test_invalid_bytes_rejected() {
        let clipboard = MemoryClipboard::new();
        clipboard.put_bytes("before".as_bytes()).unwrap();
        let err = clipboard.put_bytes(&[0x68, 0xC3]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidValue);
        assert_eq!(clipboard.text(), None);
    }
}
