//! Renderer abstraction: an immediate-mode drawing surface and the frame
//! drawing routine built on it.

use kurbo::{Affine, Ellipse, Line, Point, Rect, Size};
use peniko::Color;
use shapeboard_core::selection::{HANDLE_SIZE, get_handles};
use shapeboard_core::shapes::{Shape, ShapeId, ShapeKind};
use shapeboard_core::{ShapeStore, ViewState};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Canvas-space spacing of the reference grid.
pub const GRID_SIZE: f64 = 20.0;
/// Selection outline width in screen pixels.
pub const SELECTION_STROKE_WIDTH: f64 = 2.0;
/// Grid line width in screen pixels.
pub const GRID_STROKE_WIDTH: f64 = 1.0;

/// Drawn when a shape's fill cannot be parsed.
fn fallback_fill() -> Color {
    Color::from_rgba8(128, 128, 128, 255)
}

/// Colors used for everything that isn't a shape fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub background: Color,
    pub grid: Color,
    /// Selection outline and handle color.
    pub selection: Color,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: Color::from_rgba8(0x1e, 0x1e, 0x1e, 255),
            grid: Color::from_rgba8(0x2a, 0x2a, 0x2a, 255),
            selection: Color::WHITE,
        }
    }
}

/// An immediate-mode 2D drawing target.
///
/// Geometry is given in the coordinate space set by the last
/// [`set_transform`](DrawSurface::set_transform) call; stroke widths are in
/// the same space.
pub trait DrawSurface {
    /// Fill the whole viewport, ignoring the current transform.
    fn clear(&mut self, color: Color, size: Size);

    fn set_transform(&mut self, transform: Affine);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64);

    fn fill_ellipse(&mut self, ellipse: Ellipse, color: Color);

    fn stroke_ellipse(&mut self, ellipse: Ellipse, color: Color, width: f64);

    fn stroke_line(&mut self, line: Line, color: Color, width: f64);
}

/// Trait for rendering backends that build a whole frame at once.
pub trait Renderer {
    /// Build the scene/command buffer for a frame.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.style.background
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The shapes, selection and view to draw.
    pub store: &'a ShapeStore,
    /// In-progress shape from a creation drag.
    pub pending: Option<&'a Shape>,
    /// Viewport size in pixels.
    pub viewport_size: Size,
    pub style: RenderStyle,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(store: &'a ShapeStore, viewport_size: Size) -> Self {
        Self {
            store,
            pending: None,
            viewport_size,
            style: RenderStyle::default(),
        }
    }

    pub fn with_pending(mut self, pending: Option<&'a Shape>) -> Self {
        self.pending = pending;
        self
    }

    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }
}

/// Draw one frame: background, grid, shapes, pending shape, then the
/// selection outline and handles.
pub fn render_frame(ctx: &RenderContext, surface: &mut dyn DrawSurface) {
    let view = ctx.store.view();

    surface.set_transform(Affine::IDENTITY);
    surface.clear(ctx.style.background, ctx.viewport_size);

    surface.set_transform(view.transform());
    render_grid(surface, view, ctx.viewport_size, ctx.style.grid);

    for shape in ctx.store.shapes() {
        render_shape(surface, shape);
    }
    if let Some(pending) = ctx.pending {
        render_shape(surface, pending);
    }

    if let Some(selected) = ctx.store.selected_shape() {
        render_selection(surface, selected, view.zoom, ctx.style.selection);
    }
}

/// Upper bound on grid lines per axis.
const MAX_GRID_LINES: usize = 10_000;

/// Grid lines covering the viewport, in canvas space.
///
/// Lines start on a multiple of [`GRID_SIZE`] left of / above the viewport
/// and run a couple of cells past its far edge. Far enough from the origin
/// that one cell is below `f64` resolution, no grid is drawn.
pub fn grid_lines(view: ViewState, viewport: Size) -> Vec<Line> {
    let origin = view.screen_to_canvas(Point::ZERO);
    let start_x = (origin.x / GRID_SIZE).floor() * GRID_SIZE;
    let start_y = (origin.y / GRID_SIZE).floor() * GRID_SIZE;
    let end_x = start_x + viewport.width / view.zoom + GRID_SIZE * 2.0;
    let end_y = start_y + viewport.height / view.zoom + GRID_SIZE * 2.0;

    let (Some(xs), Some(ys)) = (grid_steps(start_x, end_x), grid_steps(start_y, end_y)) else {
        return Vec::new();
    };
    let verticals = xs.map(|x| Line::new((x, start_y), (x, end_y)));
    let horizontals = ys.map(|y| Line::new((start_x, y), (end_x, y)));
    verticals.chain(horizontals).collect()
}

/// Positions `start, start + GRID_SIZE, ...` below `end`, or `None` when
/// a step can't be represented at this magnitude.
fn grid_steps(start: f64, end: f64) -> Option<impl Iterator<Item = f64>> {
    if !start.is_finite() || !end.is_finite() || start + GRID_SIZE == start {
        return None;
    }
    let count = ((end - start) / GRID_SIZE).ceil().max(0.0) as usize;
    Some((0..count.min(MAX_GRID_LINES)).map(move |i| start + i as f64 * GRID_SIZE))
}

fn render_grid(surface: &mut dyn DrawSurface, view: ViewState, viewport: Size, color: Color) {
    let width = GRID_STROKE_WIDTH / view.zoom;
    for line in grid_lines(view, viewport) {
        surface.stroke_line(line, color, width);
    }
}

fn render_shape(surface: &mut dyn DrawSurface, shape: &Shape) {
    let color = fill_color(&shape.fill);
    let bounds = shape.bounds();
    match shape.kind {
        ShapeKind::Rectangle => surface.fill_rect(bounds, color),
        ShapeKind::Ellipse => surface.fill_ellipse(Ellipse::from_rect(bounds), color),
    }
}

fn render_selection(surface: &mut dyn DrawSurface, shape: &Shape, zoom: f64, color: Color) {
    let bounds = shape.bounds();
    let width = SELECTION_STROKE_WIDTH / zoom;
    match shape.kind {
        ShapeKind::Rectangle => surface.stroke_rect(bounds, color, width),
        ShapeKind::Ellipse => surface.stroke_ellipse(Ellipse::from_rect(bounds), color, width),
    }

    // Handles stay HANDLE_SIZE pixels on screen at any zoom.
    let size = HANDLE_SIZE / zoom;
    for handle in get_handles(shape) {
        surface.fill_rect(Rect::from_center_size(handle.position, Size::new(size, size)), color);
    }
}

/// Parse a `#rgb`, `#rrggbb` or `#rrggbbaa` color string.
pub fn parse_color(value: &str) -> RenderResult<Color> {
    let invalid = || RendererError::InvalidColor(value.to_string());
    let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    match hex.len() {
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Ok(Color::from_rgba8(expand(0)?, expand(1)?, expand(2)?, 255))
        }
        6 | 8 => {
            let alpha = if hex.len() == 8 { channel(&hex[6..8])? } else { 255 };
            Ok(Color::from_rgba8(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                alpha,
            ))
        }
        _ => Err(invalid()),
    }
}

/// Color for a shape fill, falling back to gray for unparseable values.
pub fn fill_color(fill: &str) -> Color {
    parse_color(fill).unwrap_or_else(|e| {
        log::warn!("{}; drawing with fallback fill", e);
        fallback_fill()
    })
}

/// Everything a frame depends on. Two equal keys draw identical frames.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameKey {
    revision: u64,
    selection: Option<ShapeId>,
    view: ViewState,
    pending: Option<Shape>,
    viewport: Size,
}

impl FrameKey {
    pub fn capture(store: &ShapeStore, pending: Option<&Shape>, viewport: Size) -> Self {
        Self {
            revision: store.revision(),
            selection: store.selected_id().cloned(),
            view: store.view(),
            pending: pending.cloned(),
            viewport,
        }
    }
}

/// Decides whether a new frame needs drawing.
#[derive(Debug, Default)]
pub struct RedrawTracker {
    last: Option<FrameKey>,
}

impl RedrawTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn needs_redraw(&self, key: &FrameKey) -> bool {
        self.last.as_ref() != Some(key)
    }

    /// Record that a frame for `key` was presented.
    pub fn mark_drawn(&mut self, key: FrameKey) {
        self.last = Some(key);
    }

    /// Force the next check to redraw (e.g. after the surface was recreated).
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}
