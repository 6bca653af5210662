//! Keyboard shortcut registry and documentation.

use shapeboard_core::shortcuts::BINDINGS;

/// A keyboard shortcut definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub key: &'static str,
    /// Ctrl, or Cmd on macOS.
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        // Letter keys display uppercase.
        let key = if self.key.chars().count() == 1 {
            self.key.to_uppercase()
        } else {
            self.key.to_string()
        };
        parts.push(&key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts: the key bindings followed by the
    /// pointer gestures that depend on held keys.
    pub fn all() -> Vec<Shortcut> {
        let mut shortcuts: Vec<Shortcut> = BINDINGS
            .iter()
            .map(|b| Shortcut::new(b.key.label(), b.platform, b.shift, b.command.description()))
            .collect();
        shortcuts.push(Shortcut::new("Space+Drag", false, false, "Pan the canvas"));
        shortcuts.push(Shortcut::new("Wheel", true, false, "Zoom around the pointer"));
        shortcuts
    }

    /// Log all shortcuts at info level.
    pub fn log_all() {
        log::info!("Keyboard shortcuts:");
        for shortcut in Self::all() {
            log::info!("  {:20} {}", shortcut.format(), shortcut.description);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(Shortcut::new("z", true, true, "Redo").format(), "Ctrl+Shift+Z");
        assert_eq!(Shortcut::new("Delete", false, false, "").format(), "Delete");
        assert_eq!(Shortcut::new("Wheel", true, false, "").format(), "Ctrl+Wheel");
    }

    #[test]
    fn test_registry_lists_every_binding() {
        let all = ShortcutRegistry::all();
        assert_eq!(all.len(), BINDINGS.len() + 2);
        assert!(all.iter().any(|s| s.key == "z" && s.ctrl && s.shift && s.description == "Redo"));
        assert!(all.iter().any(|s| s.key == "r" && !s.ctrl && s.description == "Rectangle tool"));
        assert!(all.iter().any(|s| s.key == "Space+Drag"));
    }
}
