//! Shapeboard Render Library
//!
//! Draws the editor's canvas onto an immediate-mode [`DrawSurface`].
//! The default implementation uses Vello for GPU-accelerated rendering.

mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{
    DrawSurface, FrameKey, GRID_SIZE, RedrawTracker, RenderContext, RenderResult, RenderStyle,
    Renderer, RendererError, fill_color, grid_lines, parse_color, render_frame,
};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::{VelloRenderer, VelloSurface};
