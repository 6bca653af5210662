//! Translation of winit window events into editor input events.

use kurbo::Point;
use shapeboard_core::input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
use shapeboard_core::selection::CursorKind;
use winit::event::{ElementState, MouseButton as WinitButton, MouseScrollDelta};
use winit::keyboard::{Key as WinitKey, ModifiersState, NamedKey};
use winit::window::CursorIcon;

/// Pixels per scrolled line for line-based wheel deltas.
const LINE_SCROLL_PIXELS: f64 = 40.0;

/// Tracks the pointer position and modifier state between window events.
///
/// winit reports modifiers and cursor position separately from button and
/// wheel events, so they are remembered here and attached on translation.
#[derive(Debug, Default)]
pub struct EventHandler {
    cursor_position: Point,
    modifiers: Modifiers,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor_position(&self) -> Point {
        self.cursor_position
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn modifiers_changed(&mut self, state: ModifiersState) {
        self.modifiers = modifiers_from(state);
    }

    pub fn cursor_moved(&mut self, position: Point) -> PointerEvent {
        self.cursor_position = position;
        PointerEvent::Move { position }
    }

    /// Button press or release at the last known cursor position.
    pub fn mouse_input(&self, state: ElementState, button: WinitButton) -> Option<PointerEvent> {
        let button = translate_button(button)?;
        let position = self.cursor_position;
        Some(match state {
            ElementState::Pressed => PointerEvent::Down { position, button },
            ElementState::Released => PointerEvent::Up { position, button },
        })
    }

    /// Wheel event at the last known cursor position. Purely horizontal
    /// scrolling yields nothing.
    pub fn mouse_wheel(&self, delta: MouseScrollDelta) -> Option<PointerEvent> {
        let delta_y = wheel_delta_y(delta);
        if delta_y == 0.0 {
            return None;
        }
        Some(PointerEvent::Wheel {
            position: self.cursor_position,
            delta_y,
            modifiers: self.modifiers,
        })
    }

    /// Key event with the current modifiers. The native shell has no text
    /// fields, so focus is never inside a text input.
    pub fn key_event(&self, key: &WinitKey, repeat: bool) -> KeyEvent {
        let mut event = KeyEvent::new(translate_key(key), self.modifiers);
        event.repeat = repeat;
        event
    }
}

pub fn modifiers_from(state: ModifiersState) -> Modifiers {
    Modifiers {
        shift: state.shift_key(),
        ctrl: state.control_key(),
        alt: state.alt_key(),
        meta: state.super_key(),
    }
}

fn translate_button(button: WinitButton) -> Option<MouseButton> {
    match button {
        WinitButton::Left => Some(MouseButton::Left),
        WinitButton::Right => Some(MouseButton::Right),
        WinitButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

/// Vertical delta in pixels, positive when scrolling towards the user.
///
/// winit reports scrolling up (away from the user) as positive.
fn wheel_delta_y(delta: MouseScrollDelta) -> f64 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -(y as f64) * LINE_SCROLL_PIXELS,
        MouseScrollDelta::PixelDelta(pos) => -pos.y,
    }
}

pub fn translate_key(key: &WinitKey) -> Key {
    match key {
        WinitKey::Named(NamedKey::Space) => Key::Space,
        WinitKey::Named(NamedKey::Delete) => Key::Delete,
        WinitKey::Named(NamedKey::Backspace) => Key::Backspace,
        WinitKey::Named(NamedKey::Escape) => Key::Escape,
        WinitKey::Character(c) if c.as_str() == " " => Key::Space,
        WinitKey::Character(c) => Key::Character(c.to_string()),
        _ => Key::Other,
    }
}

/// Map an editor cursor to the platform cursor icon.
pub fn cursor_icon(kind: CursorKind) -> CursorIcon {
    match kind {
        CursorKind::Default => CursorIcon::Default,
        CursorKind::Crosshair => CursorIcon::Crosshair,
        CursorKind::Grab => CursorIcon::Grab,
        CursorKind::Grabbing => CursorIcon::Grabbing,
        CursorKind::NwseResize => CursorIcon::NwseResize,
        CursorKind::NeswResize => CursorIcon::NeswResize,
    }
}
