//! Pure coordinate and hit-testing helpers.
//!
//! Screen space is the pointer/pixel space of the drawing surface; canvas
//! space is where shapes live. The view maps `screen = canvas * zoom + offset`.

use crate::selection::{Corner, HANDLE_SIZE, get_handles};
use crate::shapes::Shape;
use kurbo::{Point, Vec2};

/// Convert a screen point into canvas space.
pub fn to_canvas_space(screen: Point, offset: Vec2, zoom: f64) -> Point {
    Point::new((screen.x - offset.x) / zoom, (screen.y - offset.y) / zoom)
}

/// Convert a canvas point into screen space.
pub fn to_screen_space(canvas: Point, offset: Vec2, zoom: f64) -> Point {
    Point::new(canvas.x * zoom + offset.x, canvas.y * zoom + offset.y)
}

/// Find the topmost shape whose box contains `point` (edges inclusive).
pub fn hit_test_shapes(point: Point, shapes: &[Shape]) -> Option<&Shape> {
    shapes.iter().rev().find(|shape| shape.contains(point))
}

/// Find the resize handle of `shape` under a canvas-space `point`.
///
/// The hit radius is [`HANDLE_SIZE`] screen pixels, so it shrinks in canvas
/// units as the zoom grows.
pub fn hit_test_resize_handle(point: Point, shape: &Shape, zoom: f64) -> Option<Corner> {
    let tolerance = HANDLE_SIZE / zoom;
    get_handles(shape)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.corner)
}

/// Flip negative width/height into a positive box covering the same area.
pub fn normalize_shape(shape: &Shape) -> Shape {
    let mut normalized = shape.clone();
    if shape.width < 0.0 {
        normalized.x = shape.x + shape.width;
        normalized.width = shape.width.abs();
    }
    if shape.height < 0.0 {
        normalized.y = shape.y + shape.height;
        normalized.height = shape.height.abs();
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeKind;

    fn rect(id: &str, x: f64, y: f64, width: f64, height: f64) -> Shape {
        Shape::new(ShapeKind::Rectangle, Point::new(x, y), width, height).with_id(id)
    }

    fn assert_point_eq(actual: Point, expected: Point) {
        assert!((actual.x - expected.x).abs() < 1e-9, "{actual:?} != {expected:?}");
        assert!((actual.y - expected.y).abs() < 1e-9, "{actual:?} != {expected:?}");
    }

    #[test]
    fn test_to_canvas_with_zoom_and_offset() {
        let p = to_canvas_space(Point::new(200.0, 150.0), Vec2::new(100.0, 50.0), 2.0);
        assert_point_eq(p, Point::new(50.0, 50.0));
    }

    #[test]
    fn test_to_canvas_zoomed_out() {
        let p = to_canvas_space(Point::new(100.0, 100.0), Vec2::ZERO, 0.5);
        assert_point_eq(p, Point::new(200.0, 200.0));
    }

    #[test]
    fn test_to_canvas_negative_offset() {
        let p = to_canvas_space(Point::new(50.0, 50.0), Vec2::new(-100.0, -100.0), 1.0);
        assert_point_eq(p, Point::new(150.0, 150.0));
    }

    #[test]
    fn test_roundtrip_over_views() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(123.5, -456.25),
            Point::new(1920.0, 1080.0),
        ];
        let views = [
            (Vec2::ZERO, 1.0),
            (Vec2::new(30.0, -20.0), 1.5),
            (Vec2::new(-512.0, 77.0), 0.1),
            (Vec2::new(3.0, 4.0), 5.0),
        ];
        for &(offset, zoom) in &views {
            for &p in &points {
                let back = to_screen_space(to_canvas_space(p, offset, zoom), offset, zoom);
                assert_point_eq(back, p);
            }
        }
    }

    #[test]
    fn test_hit_test_topmost_wins() {
        let shapes = vec![rect("1", 0.0, 0.0, 100.0, 100.0), rect("2", 50.0, 50.0, 100.0, 100.0)];
        let hit = hit_test_shapes(Point::new(75.0, 75.0), &shapes);
        assert_eq!(hit.map(|s| s.id.as_str()), Some("2"));
    }

    #[test]
    fn test_hit_test_empty_area() {
        let shapes = vec![rect("1", 0.0, 0.0, 100.0, 100.0), rect("2", 50.0, 50.0, 100.0, 100.0)];
        assert!(hit_test_shapes(Point::new(200.0, 200.0), &shapes).is_none());
        assert!(hit_test_shapes(Point::new(10.0, 10.0), &[]).is_none());
    }

    #[test]
    fn test_hit_test_lower_shape_outside_overlap() {
        let shapes = vec![rect("1", 0.0, 0.0, 100.0, 100.0), rect("2", 50.0, 50.0, 100.0, 100.0)];
        let hit = hit_test_shapes(Point::new(25.0, 25.0), &shapes);
        assert_eq!(hit.map(|s| s.id.as_str()), Some("1"));
    }

    #[test]
    fn test_hit_test_boundary_counts() {
        let shapes = vec![rect("1", 0.0, 0.0, 100.0, 100.0), rect("2", 50.0, 50.0, 100.0, 100.0)];
        let hit = hit_test_shapes(Point::new(0.0, 0.0), &shapes);
        assert_eq!(hit.map(|s| s.id.as_str()), Some("1"));
        assert_eq!(
            hit_test_shapes(Point::new(100.0, 100.0), &shapes).map(|s| s.id.as_str()),
            Some("2")
        );
        assert_eq!(
            hit_test_shapes(Point::new(150.0, 150.0), &shapes).map(|s| s.id.as_str()),
            Some("2")
        );
    }

    #[test]
    fn test_resize_handles_at_zoom_one() {
        let shape = rect("1", 100.0, 100.0, 200.0, 150.0);
        assert_eq!(hit_test_resize_handle(Point::new(100.0, 100.0), &shape, 1.0), Some(Corner::Nw));
        assert_eq!(hit_test_resize_handle(Point::new(300.0, 100.0), &shape, 1.0), Some(Corner::Ne));
        assert_eq!(hit_test_resize_handle(Point::new(100.0, 250.0), &shape, 1.0), Some(Corner::Sw));
        assert_eq!(hit_test_resize_handle(Point::new(300.0, 250.0), &shape, 1.0), Some(Corner::Se));
        assert_eq!(hit_test_resize_handle(Point::new(200.0, 175.0), &shape, 1.0), None);
    }

    #[test]
    fn test_resize_handle_radius_scales_with_zoom() {
        let shape = rect("1", 100.0, 100.0, 200.0, 150.0);
        assert_eq!(hit_test_resize_handle(Point::new(103.0, 103.0), &shape, 2.0), Some(Corner::Nw));
        assert_eq!(hit_test_resize_handle(Point::new(106.0, 106.0), &shape, 2.0), None);
        // Zoomed out, the same 6 units is well within reach.
        assert_eq!(hit_test_resize_handle(Point::new(106.0, 106.0), &shape, 0.5), Some(Corner::Nw));
    }

    #[test]
    fn test_resize_handle_needs_both_axes() {
        let shape = rect("1", 100.0, 100.0, 200.0, 150.0);
        assert_eq!(hit_test_resize_handle(Point::new(104.0, 120.0), &shape, 1.0), None);
    }

    #[test]
    fn test_normalize_negative_width() {
        let n = normalize_shape(&rect("1", 100.0, 50.0, -50.0, 30.0));
        assert_eq!((n.x, n.y, n.width, n.height), (50.0, 50.0, 50.0, 30.0));
    }

    #[test]
    fn test_normalize_negative_height() {
        let n = normalize_shape(&rect("1", 100.0, 100.0, 50.0, -60.0));
        assert_eq!((n.x, n.y, n.width, n.height), (100.0, 40.0, 50.0, 60.0));
    }

    #[test]
    fn test_normalize_both_negative() {
        let n = normalize_shape(&rect("1", 100.0, 100.0, -50.0, -60.0));
        assert_eq!((n.x, n.y, n.width, n.height), (50.0, 40.0, 50.0, 60.0));
    }

    #[test]
    fn test_normalize_leaves_positive_unchanged() {
        let shape = rect("1", 10.0, 20.0, 30.0, 40.0);
        assert_eq!(normalize_shape(&shape), shape);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for (w, h) in [(-5.0, 7.0), (0.0, -0.5), (12.0, 3.0), (-100.0, -100.0)] {
            let once = normalize_shape(&rect("1", 3.0, 4.0, w, h));
            assert!(once.is_normalized());
            assert_eq!(normalize_shape(&once), once);
        }
    }
}
