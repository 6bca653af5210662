//! Keyboard shortcut table and resolution into store commands.

use crate::input::{Key, KeyEvent};
use crate::store::ShapeStore;
use crate::tools::ToolKind;

/// Fill colors reachable with the digit keys `1`-`8`.
pub const PALETTE: [&str; 8] = [
    "#3b82f6", "#8b5cf6", "#ef4444", "#f97316", "#eab308", "#22c55e", "#ec4899", "#ffffff",
];

/// An editor command triggered from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetTool(ToolKind),
    DeleteSelected,
    Undo,
    Redo,
    DuplicateSelected,
    SetFill(&'static str),
}

impl Command {
    /// Run the command against the store.
    pub fn apply(self, store: &mut ShapeStore) {
        match self {
            Command::SetTool(tool) => store.set_tool(tool),
            Command::DeleteSelected => {
                if let Some(id) = store.selected_id().cloned() {
                    store.delete_shape(&id);
                }
            }
            Command::Undo => {
                store.undo();
            }
            Command::Redo => {
                store.redo();
            }
            Command::DuplicateSelected => {
                store.duplicate_selected();
            }
            Command::SetFill(fill) => store.set_fill_of_selected(fill),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Command::SetTool(ToolKind::Select) => "Select tool",
            Command::SetTool(ToolKind::Rectangle) => "Rectangle tool",
            Command::SetTool(ToolKind::Ellipse) => "Ellipse tool",
            Command::DeleteSelected => "Delete selected shape",
            Command::Undo => "Undo",
            Command::Redo => "Redo",
            Command::DuplicateSelected => "Duplicate selected shape",
            Command::SetFill(_) => "Apply palette color",
        }
    }
}

/// Which key a binding listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMatch {
    /// Case-insensitive character.
    Char(&'static str),
    Delete,
    Backspace,
}

impl KeyMatch {
    fn matches(self, key: &Key) -> bool {
        match (self, key) {
            (KeyMatch::Char(c), Key::Character(typed)) => typed.eq_ignore_ascii_case(c),
            (KeyMatch::Delete, Key::Delete) => true,
            (KeyMatch::Backspace, Key::Backspace) => true,
            _ => false,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            KeyMatch::Char(c) => c,
            KeyMatch::Delete => "Delete",
            KeyMatch::Backspace => "Backspace",
        }
    }
}

/// A single key binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub key: KeyMatch,
    /// Requires Ctrl or Cmd.
    pub platform: bool,
    pub shift: bool,
    pub command: Command,
}

impl Binding {
    const fn new(key: KeyMatch, platform: bool, shift: bool, command: Command) -> Self {
        Self {
            key,
            platform,
            shift,
            command,
        }
    }

    fn matches(&self, event: &KeyEvent) -> bool {
        self.key.matches(&event.key)
            && self.platform == event.modifiers.platform()
            && (!self.platform || self.shift == event.modifiers.shift)
    }
}

/// All bindings, in resolution order.
pub const BINDINGS: [Binding; 17] = [
    Binding::new(KeyMatch::Char("z"), true, true, Command::Redo),
    Binding::new(KeyMatch::Char("z"), true, false, Command::Undo),
    Binding::new(KeyMatch::Char("d"), true, false, Command::DuplicateSelected),
    Binding::new(KeyMatch::Char("v"), false, false, Command::SetTool(ToolKind::Select)),
    Binding::new(KeyMatch::Char("r"), false, false, Command::SetTool(ToolKind::Rectangle)),
    Binding::new(KeyMatch::Char("o"), false, false, Command::SetTool(ToolKind::Ellipse)),
    Binding::new(KeyMatch::Delete, false, false, Command::DeleteSelected),
    Binding::new(KeyMatch::Backspace, false, false, Command::DeleteSelected),
    Binding::new(KeyMatch::Char("1"), false, false, Command::SetFill(PALETTE[0])),
    Binding::new(KeyMatch::Char("2"), false, false, Command::SetFill(PALETTE[1])),
    Binding::new(KeyMatch::Char("3"), false, false, Command::SetFill(PALETTE[2])),
    Binding::new(KeyMatch::Char("4"), false, false, Command::SetFill(PALETTE[3])),
    Binding::new(KeyMatch::Char("5"), false, false, Command::SetFill(PALETTE[4])),
    Binding::new(KeyMatch::Char("6"), false, false, Command::SetFill(PALETTE[5])),
    Binding::new(KeyMatch::Char("7"), false, false, Command::SetFill(PALETTE[6])),
    Binding::new(KeyMatch::Char("8"), false, false, Command::SetFill(PALETTE[7])),
    Binding::new(KeyMatch::Char("y"), true, false, Command::Redo),
];

/// Resolve a key press to a command.
///
/// Returns `None` when focus is inside a text input.
pub fn command_for(event: &KeyEvent) -> Option<Command> {
    if event.in_text_input {
        return None;
    }
    BINDINGS
        .iter()
        .find(|binding| binding.matches(event))
        .map(|binding| binding.command)
}
