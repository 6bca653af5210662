//! Shape definitions for the editor.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Default fill for newly drawn rectangles.
pub const RECTANGLE_FILL: &str = "#3b82f6";
/// Default fill for newly drawn ellipses.
pub const ELLIPSE_FILL: &str = "#8b5cf6";

/// Opaque unique shape identifier.
///
/// Fresh ids are UUID v4 strings, but ids loaded from a saved snapshot are
/// taken verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(String);

impl ShapeId {
    /// Generate a new random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShapeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ShapeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The geometric kind of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
}

impl ShapeKind {
    /// Fill color a freshly drawn shape of this kind starts with.
    pub fn default_fill(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => RECTANGLE_FILL,
            ShapeKind::Ellipse => ELLIPSE_FILL,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Ellipse => "ellipse",
        }
    }
}

/// A rectangle or ellipse described by its axis-aligned box.
///
/// `width` and `height` may be negative while a shape is being drawn or
/// resized; stored shapes are normalized (see [`crate::geometry::normalize_shape`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// CSS-style color string, e.g. `#3b82f6`.
    pub fill: String,
}

impl Shape {
    /// Create a shape with a fresh id and the kind's default fill.
    pub fn new(kind: ShapeKind, origin: Point, width: f64, height: f64) -> Self {
        Self {
            id: ShapeId::new(),
            kind,
            x: origin.x,
            y: origin.y,
            width,
            height,
            fill: kind.default_fill().to_string(),
        }
    }

    /// Create a zero-size shape at `origin`, the starting point of a drag.
    pub fn pending(kind: ShapeKind, origin: Point) -> Self {
        Self::new(kind, origin, 0.0, 0.0)
    }

    pub fn with_id(mut self, id: impl Into<ShapeId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Top-left of the stored box (not normalized).
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Normalized bounding box, valid even for negative sizes.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }

    /// Whether width and height are both non-negative.
    pub fn is_normalized(&self) -> bool {
        self.width >= 0.0 && self.height >= 0.0
    }

    /// Inclusive containment test against the stored box.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Copy this shape under a new id, shifted by `offset`.
    pub fn duplicate(&self, offset: Vec2) -> Shape {
        let mut copy = self.clone();
        copy.id = ShapeId::new();
        copy.translate(offset);
        copy
    }
}
