//! Platform-neutral pointer and keyboard events.
//!
//! The app shell translates its windowing events into these types; the
//! interaction state machine consumes them.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Ctrl on Linux/Windows, Cmd on macOS. Either one counts.
    pub fn platform(&self) -> bool {
        self.ctrl || self.meta
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    /// The pointer left the drawing surface.
    Leave,
    /// Vertical wheel delta; positive scrolls towards the user.
    Wheel {
        position: Point,
        delta_y: f64,
        modifiers: Modifiers,
    },
}

/// Logical key, independent of keyboard layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A printable character, as typed.
    Character(String),
    Space,
    Delete,
    Backspace,
    Escape,
    Other,
}

impl Key {
    pub fn character(c: impl Into<String>) -> Self {
        Key::Character(c.into())
    }

    /// The character lowercased, if this is a character key.
    pub fn as_lowercase(&self) -> Option<String> {
        match self {
            Key::Character(c) => Some(c.to_lowercase()),
            _ => None,
        }
    }
}

/// A key press or release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    /// Auto-repeat from holding the key down.
    pub repeat: bool,
    pub modifiers: Modifiers,
    /// Keyboard focus is inside a text field; shortcuts do not apply.
    pub in_text_input: bool,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            repeat: false,
            modifiers,
            in_text_input: false,
        }
    }

    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }

    pub fn in_text_input(mut self) -> Self {
        self.in_text_input = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_modifier() {
        assert!(!Modifiers::NONE.platform());
        assert!(Modifiers::NONE.with_ctrl().platform());
        assert!(Modifiers::NONE.with_meta().platform());
        assert!(!Modifiers::NONE.with_shift().platform());
    }

    #[test]
    fn test_key_lowercase() {
        assert_eq!(Key::character("Z").as_lowercase().as_deref(), Some("z"));
        assert_eq!(Key::Space.as_lowercase(), None);
    }

    #[test]
    fn test_key_event_builders() {
        let event = KeyEvent::new(Key::Space, Modifiers::NONE).repeated().in_text_input();
        assert!(event.repeat);
        assert!(event.in_text_input);
    }
}
