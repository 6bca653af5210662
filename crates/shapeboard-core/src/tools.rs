//! Tool system for the editor.

use crate::shapes::ShapeKind;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Rectangle,
    Ellipse,
}

impl ToolKind {
    /// The shape kind this tool draws, or `None` for the select tool.
    pub fn creates(self) -> Option<ShapeKind> {
        match self {
            ToolKind::Select => None,
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Ellipse => Some(ShapeKind::Ellipse),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Rectangle => "Rectangle",
            ToolKind::Ellipse => "Ellipse",
        }
    }
}
