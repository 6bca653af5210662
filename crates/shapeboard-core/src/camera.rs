//! View state for pan/zoom transforms.

use crate::geometry::{to_canvas_space, to_screen_space};
use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum allowed zoom level.
pub const MIN_ZOOM: f64 = 0.1;
/// Maximum allowed zoom level.
pub const MAX_ZOOM: f64 = 5.0;
/// Wheel zoom factor when scrolling towards the user (zoom out).
pub const ZOOM_OUT_FACTOR: f64 = 0.95;
/// Wheel zoom factor when scrolling away from the user (zoom in).
pub const ZOOM_IN_FACTOR: f64 = 1.05;

/// The canvas-to-screen transform: `screen = canvas * zoom + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Current zoom level (1.0 = 100%).
    pub zoom: f64,
    /// Current translation offset (pan), in screen pixels.
    pub offset: Vec2,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl ViewState {
    pub fn new(zoom: f64, offset: Vec2) -> Self {
        Self { zoom, offset }
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts canvas coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Convert a screen point to canvas coordinates.
    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        to_canvas_space(screen_point, self.offset, self.zoom)
    }

    /// Convert a canvas point to screen coordinates.
    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        to_screen_space(canvas_point, self.offset, self.zoom)
    }

    /// Zoom by `factor` while keeping the canvas point under `screen_point` fixed.
    ///
    /// Returns the resulting view; the zoom is clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn zoomed_at(&self, screen_point: Point, factor: f64) -> ViewState {
        let new_zoom = clamp_zoom(self.zoom * factor);
        let ratio = new_zoom / self.zoom;
        let anchor = screen_point.to_vec2();
        ViewState {
            zoom: new_zoom,
            offset: anchor - (anchor - self.offset) * ratio,
        }
    }

    /// Zoom as a whole percentage for display.
    pub fn zoom_percent(&self) -> i64 {
        (self.zoom * 100.0).round() as i64
    }
}

/// Clamp a zoom level into the supported range.
pub fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Zoom factor for a wheel event with the given vertical delta.
pub fn wheel_zoom_factor(delta_y: f64) -> f64 {
    if delta_y > 0.0 {
        ZOOM_OUT_FACTOR
    } else {
        ZOOM_IN_FACTOR
    }
}
