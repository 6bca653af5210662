//! Pointer-interaction state machine.
//!
//! Turns pointer, wheel and keyboard events into store mutations. Pointer
//! positions arrive in screen space and are converted with the store's
//! current view.

use crate::camera::wheel_zoom_factor;
use crate::geometry::{hit_test_resize_handle, hit_test_shapes, normalize_shape};
use crate::input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::selection::{Corner, CursorKind, apply_resize};
use crate::shapes::Shape;
use crate::shortcuts::command_for;
use crate::store::ShapeStore;
use crate::tools::ToolKind;
use kurbo::Point;

/// Shapes must be larger than this on both axes to be committed.
pub const MIN_SHAPE_SIZE: f64 = 5.0;

/// What the current pointer drag is doing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragMode {
    #[default]
    Idle,
    /// Dragging the view. `last` is in screen space.
    Panning { last: Point },
    /// Drawing a new shape from `anchor` (canvas space).
    Creating { anchor: Point, pending: Shape },
    /// Dragging the selected shape. `last` is in canvas space.
    Moving { last: Point },
    /// Dragging a corner of the selected shape. `last` is in canvas space.
    Resizing { handle: Corner, last: Point },
}

/// Transient interaction state. Nothing here is persisted or undoable.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    mode: DragMode,
    space_held: bool,
    hovered_handle: Option<Corner>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &DragMode {
        &self.mode
    }

    pub fn is_idle(&self) -> bool {
        self.mode == DragMode::Idle
    }

    pub fn is_space_held(&self) -> bool {
        self.space_held
    }

    pub fn hovered_handle(&self) -> Option<Corner> {
        self.hovered_handle
    }

    /// The shape being drawn, if a creation drag is in progress.
    pub fn pending_shape(&self) -> Option<&Shape> {
        match &self.mode {
            DragMode::Creating { pending, .. } => Some(pending),
            _ => None,
        }
    }

    /// Dispatch a pointer event. Only the left button starts or ends drags.
    pub fn handle_pointer(&mut self, store: &mut ShapeStore, event: &PointerEvent) {
        match *event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => self.pointer_down(store, position),
            PointerEvent::Up {
                button: MouseButton::Left,
                ..
            } => self.pointer_up(store),
            PointerEvent::Down { .. } | PointerEvent::Up { .. } => {}
            PointerEvent::Move { position } => self.pointer_move(store, position),
            PointerEvent::Leave => self.pointer_leave(store),
            PointerEvent::Wheel {
                position,
                delta_y,
                modifiers,
            } => {
                self.wheel(store, position, delta_y, modifiers);
            }
        }
    }

    pub fn pointer_down(&mut self, store: &mut ShapeStore, screen: Point) {
        if !self.is_idle() {
            return;
        }
        self.hovered_handle = None;

        if self.space_held {
            self.mode = DragMode::Panning { last: screen };
            return;
        }

        let canvas = store.view().screen_to_canvas(screen);
        match store.tool().creates() {
            Some(kind) => {
                self.mode = DragMode::Creating {
                    anchor: canvas,
                    pending: Shape::pending(kind, canvas),
                };
            }
            None => {
                let handle = store
                    .selected_shape()
                    .and_then(|shape| hit_test_resize_handle(canvas, shape, store.zoom()));
                if let Some(handle) = handle {
                    store.begin_gesture();
                    self.mode = DragMode::Resizing {
                        handle,
                        last: canvas,
                    };
                    return;
                }

                let hit = hit_test_shapes(canvas, store.shapes()).map(|shape| shape.id.clone());
                match hit {
                    Some(id) => {
                        store.set_selection(Some(id));
                        store.begin_gesture();
                        self.mode = DragMode::Moving { last: canvas };
                    }
                    None => store.set_selection(None),
                }
            }
        }
    }

    pub fn pointer_move(&mut self, store: &mut ShapeStore, screen: Point) {
        let view = store.view();
        let canvas = view.screen_to_canvas(screen);

        match &mut self.mode {
            DragMode::Idle => {
                self.hovered_handle = store
                    .selected_shape()
                    .and_then(|shape| hit_test_resize_handle(canvas, shape, view.zoom));
            }
            DragMode::Panning { last } => {
                let delta = screen - *last;
                *last = screen;
                store.set_pan_offset(view.offset + delta);
            }
            DragMode::Creating { anchor, pending } => {
                pending.width = canvas.x - anchor.x;
                pending.height = canvas.y - anchor.y;
            }
            DragMode::Moving { last } => {
                let delta = canvas - *last;
                if let Some(mut shape) = store.selected_shape().cloned() {
                    shape.translate(delta);
                    store.update_shape(shape);
                    *last = canvas;
                }
            }
            DragMode::Resizing { handle, last } => {
                let delta = canvas - *last;
                if let Some(shape) = store.selected_shape() {
                    let resized = apply_resize(shape, *handle, delta);
                    store.update_shape(resized);
                    *last = canvas;
                }
            }
        }
    }

    /// Finish the current drag and return to idle.
    pub fn pointer_up(&mut self, store: &mut ShapeStore) {
        self.hovered_handle = None;
        match std::mem::take(&mut self.mode) {
            DragMode::Creating { pending, .. } => {
                let shape = normalize_shape(&pending);
                if shape.width > MIN_SHAPE_SIZE && shape.height > MIN_SHAPE_SIZE {
                    store.add_shape(shape);
                } else {
                    log::debug!(
                        "Discarding {}x{} {}",
                        shape.width,
                        shape.height,
                        shape.kind.name()
                    );
                }
            }
            DragMode::Resizing { .. } => {
                if let Some(shape) = store.selected_shape().filter(|s| !s.is_normalized()) {
                    let normalized = normalize_shape(shape);
                    store.update_shape(normalized);
                }
                store.end_gesture();
            }
            DragMode::Moving { .. } => store.end_gesture(),
            DragMode::Panning { .. } | DragMode::Idle => {}
        }
    }

    /// The pointer left the surface; treated exactly like a release.
    pub fn pointer_leave(&mut self, store: &mut ShapeStore) {
        self.pointer_up(store);
    }

    /// Zoom around the pointer when the platform modifier is held.
    ///
    /// Returns false (and changes nothing) otherwise, so the caller can let
    /// the event fall through.
    pub fn wheel(
        &mut self,
        store: &mut ShapeStore,
        screen: Point,
        delta_y: f64,
        modifiers: Modifiers,
    ) -> bool {
        if !modifiers.platform() {
            return false;
        }
        let view = store.view().zoomed_at(screen, wheel_zoom_factor(delta_y));
        store.set_view(view);
        true
    }

    /// Handle a key press. Returns true if the key was consumed.
    pub fn key_down(&mut self, store: &mut ShapeStore, event: &KeyEvent) -> bool {
        if event.key == Key::Space {
            if !event.repeat {
                self.space_held = true;
            }
            return true;
        }
        if event.key == Key::Escape && !event.in_text_input {
            return self.cancel(store);
        }
        match command_for(event) {
            Some(command) => {
                command.apply(store);
                true
            }
            None => false,
        }
    }

    /// Abandon a shape being drawn, or drop the selection when idle.
    fn cancel(&mut self, store: &mut ShapeStore) -> bool {
        match self.mode {
            DragMode::Creating { .. } => {
                self.mode = DragMode::Idle;
                true
            }
            DragMode::Idle if store.selected_id().is_some() => {
                store.set_selection(None);
                self.hovered_handle = None;
                true
            }
            _ => false,
        }
    }

    pub fn key_up(&mut self, event: &KeyEvent) {
        if event.key == Key::Space {
            self.space_held = false;
            if matches!(self.mode, DragMode::Panning { .. }) {
                self.mode = DragMode::Idle;
            }
        }
    }

    /// Cursor to show over the drawing surface.
    pub fn cursor(&self, store: &ShapeStore) -> CursorKind {
        if self.space_held {
            return match self.mode {
                DragMode::Panning { .. } => CursorKind::Grabbing,
                _ => CursorKind::Grab,
            };
        }
        let handle = match self.mode {
            DragMode::Resizing { handle, .. } => Some(handle),
            _ => self.hovered_handle.filter(|_| store.selected_shape().is_some()),
        };
        if let Some(handle) = handle {
            return handle.cursor();
        }
        if store.tool() != ToolKind::Select {
            CursorKind::Crosshair
        } else {
            CursorKind::Default
        }
    }
}
