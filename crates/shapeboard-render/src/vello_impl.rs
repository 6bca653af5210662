//! Vello-based renderer implementation.

use crate::renderer::{DrawSurface, RenderContext, Renderer, render_frame};
use kurbo::{Affine, Ellipse, Line, Rect, Size, Stroke};
use peniko::{Color, Fill};
use vello::Scene;

/// A [`DrawSurface`] that records into a `vello::Scene`.
#[derive(Default)]
pub struct VelloSurface {
    scene: Scene,
    transform: Affine,
}

impl VelloSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Drop all recorded drawing and reset the transform.
    pub fn reset(&mut self) {
        self.scene.reset();
        self.transform = Affine::IDENTITY;
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        self.transform = Affine::IDENTITY;
        std::mem::take(&mut self.scene)
    }
}

impl DrawSurface for VelloSurface {
    fn clear(&mut self, color: Color, size: Size) {
        let rect = Rect::from_origin_size((0.0, 0.0), size);
        self.scene.fill(Fill::NonZero, Affine::IDENTITY, color, None, &rect);
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.scene.fill(Fill::NonZero, self.transform, color, None, &rect);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.scene.stroke(&Stroke::new(width), self.transform, color, None, &rect);
    }

    fn fill_ellipse(&mut self, ellipse: Ellipse, color: Color) {
        self.scene.fill(Fill::NonZero, self.transform, color, None, &ellipse);
    }

    fn stroke_ellipse(&mut self, ellipse: Ellipse, color: Color, width: f64) {
        self.scene.stroke(&Stroke::new(width), self.transform, color, None, &ellipse);
    }

    fn stroke_line(&mut self, line: Line, color: Color, width: f64) {
        self.scene.stroke(&Stroke::new(width), self.transform, color, None, &line);
    }
}

/// Vello-based renderer for GPU-accelerated 2D graphics.
#[derive(Default)]
pub struct VelloRenderer {
    surface: VelloSurface,
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        self.surface.scene()
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        self.surface.take_scene()
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.surface.reset();
        render_frame(ctx, &mut self.surface);
    }
}
