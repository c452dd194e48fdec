//! The closed set of events a window delivers to its controls.

use std::time::Instant;

use bitflags::bitflags;
use vello::kurbo::{Point, Size};

use crate::menu::MenuCommand;
use crate::timer::TimerId;

bitflags! {
    /// A set of event categories, used as a subscription mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EventType: u8 {
        /// [Event::Mouse].
        const MOUSE = 1 << 0;
        /// [Event::Keyboard].
        const KEYBOARD = 1 << 1;
        /// [Event::Internal].
        const INTERNAL = 1 << 2;
        /// [Event::System].
        const SYSTEM = 1 << 3;
        /// Every category.
        const ALL = Self::MOUSE.bits() | Self::KEYBOARD.bits() | Self::INTERNAL.bits() | Self::SYSTEM.bits();
    }
}

bitflags! {
    /// Keyboard modifiers held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 1 << 0;
        /// Control.
        const CONTROL = 1 << 1;
        /// Alt.
        const ALT = 1 << 2;
    }
}

/// What happened to the mouse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseEventKind {
    /// The pointer entered the control. Synthesized by the window.
    Enter,
    /// The pointer left the control. Synthesized by the window.
    Leave,
    /// The pointer moved.
    Move,
    /// Left button pressed.
    LeftDown,
    /// Left button released.
    LeftUp,
    /// Left button double click, delivered after the second [MouseEventKind::LeftDown].
    LeftDouble,
    /// Middle button pressed.
    CenterDown,
    /// Middle button released.
    CenterUp,
    /// Right button pressed.
    RightDown,
    /// Right button released.
    RightUp,
    /// Wheel rotated; positive deltas scroll towards the start.
    Wheel {
        /// Notches rotated.
        delta: f64,
    },
}

/// A mouse event in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    /// What happened.
    pub kind: MouseEventKind,
    /// Pointer position.
    pub position: Point,
}

/// A key, independent of the keyboard layout where it matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Tab.
    Tab,
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// Backspace.
    Backspace,
    /// Delete.
    Delete,
    /// Insert.
    Insert,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Space bar.
    Space,
    /// A character key, lower case where applicable.
    Char(char),
    /// Anything else.
    Other,
}

/// Whether a key went down, came up or produced text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardEventKind {
    /// Key pressed.
    Down,
    /// Key released.
    Up,
    /// Text produced by the key press; see [KeyboardEvent::text].
    Character,
}

/// A keyboard event.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardEvent {
    /// Down, up or text.
    pub kind: KeyboardEventKind,
    /// The key.
    pub key: Key,
    /// Held modifiers.
    pub modifiers: Modifiers,
    /// Produced text, for [KeyboardEventKind::Character].
    pub text: String,
}

/// Events raised by the toolkit itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InternalEvent {
    /// The focused control was activated with Enter.
    Execute,
    /// A timer started by the receiving control fired.
    Timer(TimerId),
    /// An item of a popup menu opened by the receiving control was chosen.
    MenuCommand(MenuCommand),
}

/// Events coming from the platform or the application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SystemEvent {
    /// The window was resized.
    Resize(Size),
    /// Periodic tick that drives cooperative timers.
    Tick(Instant),
    /// The theme or locale changed.
    ThemeChanged,
    /// The window is closing.
    Close,
}

/// An event delivered to controls and subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Mouse input.
    Mouse(MouseEvent),
    /// Keyboard input.
    Keyboard(KeyboardEvent),
    /// Toolkit-internal notification.
    Internal(InternalEvent),
    /// Platform notification.
    System(SystemEvent),
}

impl Event {
    /// The category of this event.
    pub fn event_type(&self) -> EventType {
        match self {
            Event::Mouse(_) => EventType::MOUSE,
            Event::Keyboard(_) => EventType::KEYBOARD,
            Event::Internal(_) => EventType::INTERNAL,
            Event::System(_) => EventType::SYSTEM,
        }
    }

    /// A mouse event at `(x, y)`.
    pub fn mouse(kind: MouseEventKind, x: f64, y: f64) -> Self {
        Event::Mouse(MouseEvent {
            kind,
            position: Point::new(x, y),
        })
    }

    /// A key press without modifiers.
    pub fn key_down(key: Key) -> Self {
        Self::key_down_with(key, Modifiers::empty())
    }

    /// A key press with modifiers.
    pub fn key_down_with(key: Key, modifiers: Modifiers) -> Self {
        Event::Keyboard(KeyboardEvent {
            kind: KeyboardEventKind::Down,
            key,
            modifiers,
            text: String::new(),
        })
    }

    /// A key release.
    pub fn key_up(key: Key) -> Self {
        Event::Keyboard(KeyboardEvent {
            kind: KeyboardEventKind::Up,
            key,
            modifiers: Modifiers::empty(),
            text: String::new(),
        })
    }

    /// Typed text.
    pub fn character(text: impl Into<String>) -> Self {
        let text = text.into();
        let key = text.chars().next().map(Key::Char).unwrap_or(Key::Other);
        Event::Keyboard(KeyboardEvent {
            kind: KeyboardEventKind::Character,
            key,
            modifiers: Modifiers::empty(),
            text,
        })
    }

    /// The mouse payload, if this is a mouse event.
    pub fn as_mouse(&self) -> Option<&MouseEvent> {
        match self {
            Event::Mouse(mouse) => Some(mouse),
            _ => None,
        }
    }
}
