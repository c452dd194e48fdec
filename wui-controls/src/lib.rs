#![warn(missing_docs)]

//! Controls for wui => See `wui` crate.
//!
//! Contains the text input and the scrollbar.

/// Contains the [buffer::TextBuffer] text storage.
pub mod buffer;

/// Contains the [input::Input] control.
pub mod input;

/// Contains the [scroll::Scrollbar] control.
pub mod scroll;
