#![warn(missing_docs)]

//! Core functionality for wui: the control contract, windows with their event
//! dispatch and focus handling, timers, clipboard and drawing interfaces.
//!
//! See the `wui` crate for more.

/// Clipboard access.
pub mod clipboard;
/// Toolkit configuration.
pub mod config;
/// Process-wide and per-window styling context.
pub mod context;
/// The control trait and event context.
pub mod control;
/// Event model.
pub mod event;
/// Drawing and text measurement.
pub mod graphics;
/// Popup menus.
pub mod menu;
/// Cooperative timers.
pub mod timer;
/// Character-indexed UTF-8 helpers.
pub mod utf8;
/// Windows and event dispatch.
pub mod window;

pub use vello;
pub use vello::kurbo::{Point, Rect, Size, Vec2};
pub use vello::peniko::Color;
pub use wui_theme::error::{Error, ErrorKind, Result};
