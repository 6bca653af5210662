//! Selection and resize handle system.

use crate::shapes::Shape;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Handle size in screen pixels. Also the handle hit radius.
pub const HANDLE_SIZE: f64 = 8.0;

/// Corner resize handles, named by compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Corner {
    /// Hit-test order for overlapping handles on tiny shapes.
    pub const ALL: [Corner; 4] = [Corner::Nw, Corner::Ne, Corner::Sw, Corner::Se];

    /// Position of this corner on a shape's stored box.
    pub fn position(self, shape: &Shape) -> Point {
        let right = shape.x + shape.width;
        let bottom = shape.y + shape.height;
        match self {
            Corner::Nw => Point::new(shape.x, shape.y),
            Corner::Ne => Point::new(right, shape.y),
            Corner::Sw => Point::new(shape.x, bottom),
            Corner::Se => Point::new(right, bottom),
        }
    }

    /// Whether dragging this corner resizes along the top-left/bottom-right diagonal.
    pub fn is_nwse(self) -> bool {
        matches!(self, Corner::Nw | Corner::Se)
    }

    /// Resize cursor shown while hovering or dragging this corner.
    pub fn cursor(self) -> CursorKind {
        if self.is_nwse() {
            CursorKind::NwseResize
        } else {
            CursorKind::NeswResize
        }
    }
}

/// Pointer cursor feedback for the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorKind {
    #[default]
    Default,
    Crosshair,
    Grab,
    Grabbing,
    NwseResize,
    NeswResize,
}

/// A selection handle with its position and corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in canvas coordinates.
    pub position: Point,
    pub corner: Corner,
}

impl Handle {
    pub fn new(position: Point, corner: Corner) -> Self {
        Self { position, corner }
    }

    /// Check if a canvas-space point hits this handle.
    ///
    /// Uses independent per-axis distance, so the hit area is a square of
    /// half-size `tolerance` around the corner.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point.x - self.position.x).abs() <= tolerance
            && (point.y - self.position.y).abs() <= tolerance
    }
}

/// The four corner handles of a shape in hit-test order.
pub fn get_handles(shape: &Shape) -> [Handle; 4] {
    Corner::ALL.map(|corner| Handle::new(corner.position(shape), corner))
}

/// Resize `shape` by dragging `corner` by a canvas-space `delta`.
///
/// The opposite corner stays fixed. The result may have negative width or
/// height when a corner is dragged past its opposite edge.
pub fn apply_resize(shape: &Shape, corner: Corner, delta: Vec2) -> Shape {
    let mut resized = shape.clone();
    match corner {
        Corner::Se => {
            resized.width = shape.width + delta.x;
            resized.height = shape.height + delta.y;
        }
        Corner::Sw => {
            resized.x = shape.x + delta.x;
            resized.width = shape.width - delta.x;
            resized.height = shape.height + delta.y;
        }
        Corner::Ne => {
            resized.y = shape.y + delta.y;
            resized.width = shape.width + delta.x;
            resized.height = shape.height - delta.y;
        }
        Corner::Nw => {
            resized.x = shape.x + delta.x;
            resized.y = shape.y + delta.y;
            resized.width = shape.width - delta.x;
            resized.height = shape.height - delta.y;
        }
    }
    resized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeKind;

    fn shape() -> Shape {
        Shape::new(ShapeKind::Rectangle, Point::new(100.0, 100.0), 200.0, 150.0)
    }

    #[test]
    fn test_handle_positions() {
        let handles = get_handles(&shape());
        assert_eq!(handles[0].position, Point::new(100.0, 100.0));
        assert_eq!(handles[1].position, Point::new(300.0, 100.0));
        assert_eq!(handles[2].position, Point::new(100.0, 250.0));
        assert_eq!(handles[3].position, Point::new(300.0, 250.0));
        assert_eq!(handles[3].corner, Corner::Se);
    }

    #[test]
    fn test_resize_se_grows() {
        let resized = apply_resize(&shape(), Corner::Se, Vec2::new(10.0, 20.0));
        assert_eq!((resized.x, resized.y), (100.0, 100.0));
        assert_eq!((resized.width, resized.height), (210.0, 170.0));
    }

    #[test]
    fn test_resize_sw_moves_left_edge() {
        let resized = apply_resize(&shape(), Corner::Sw, Vec2::new(10.0, 20.0));
        assert_eq!((resized.x, resized.y), (110.0, 100.0));
        assert_eq!((resized.width, resized.height), (190.0, 170.0));
    }

    #[test]
    fn test_resize_ne_moves_top_edge() {
        let resized = apply_resize(&shape(), Corner::Ne, Vec2::new(10.0, 20.0));
        assert_eq!((resized.x, resized.y), (100.0, 120.0));
        assert_eq!((resized.width, resized.height), (210.0, 130.0));
    }

    #[test]
    fn test_resize_nw_keeps_opposite_corner() {
        let original = shape();
        let resized = apply_resize(&original, Corner::Nw, Vec2::new(-30.0, 40.0));
        assert_eq!(Corner::Se.position(&resized), Corner::Se.position(&original));
        assert_eq!((resized.x, resized.y), (70.0, 140.0));
    }

    #[test]
    fn test_resize_past_opposite_edge_goes_negative() {
        let resized = apply_resize(&shape(), Corner::Se, Vec2::new(-250.0, 0.0));
        assert_eq!(resized.width, -50.0);
    }

    #[test]
    fn test_diagonals() {
        assert!(Corner::Nw.is_nwse());
        assert!(Corner::Se.is_nwse());
        assert!(!Corner::Ne.is_nwse());
        assert!(!Corner::Sw.is_nwse());
        assert_eq!(Corner::Se.cursor(), CursorKind::NwseResize);
        assert_eq!(Corner::Ne.cursor(), CursorKind::NeswResize);
    }
}
