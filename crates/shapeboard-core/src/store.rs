//! The shape store: shapes, UI state, undo history and change notification.

use crate::camera::{ViewState, clamp_zoom};
use crate::history::HistoryLog;
use crate::shapes::{Shape, ShapeId};
use crate::tools::ToolKind;
use kurbo::Vec2;
use std::fmt;

/// Translation applied to a duplicated shape.
pub const DUPLICATE_OFFSET: Vec2 = Vec2::new(20.0, 20.0);

/// What part of the store changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreEvent {
    /// The shape collection (content or order) changed.
    ShapesChanged,
    SelectionChanged,
    ToolChanged,
    /// Zoom or pan offset changed.
    ViewChanged,
}

impl StoreEvent {
    /// Whether this change is part of the persisted snapshot.
    pub fn is_persisted(self) -> bool {
        matches!(self, StoreEvent::ShapesChanged | StoreEvent::ViewChanged)
    }
}

/// Handle returned by [`ShapeStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(StoreEvent)>;

/// In-memory state container for the editor.
///
/// All mutation happens through methods on this type. Each method that
/// actually changes something notifies subscribers synchronously before
/// returning; no-ops notify nothing. Every change to the shape collection is
/// recorded in the undo history.
pub struct ShapeStore {
    /// Shapes in z-order (back to front).
    shapes: Vec<Shape>,
    selected: Option<ShapeId>,
    tool: ToolKind,
    view: ViewState,
    history: HistoryLog,
    /// `Some(recorded)` while a gesture is open.
    gesture: Option<bool>,
    /// Bumped on every shape or view change.
    revision: u64,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl Default for ShapeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ShapeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeStore")
            .field("shapes", &self.shapes)
            .field("selected", &self.selected)
            .field("tool", &self.tool)
            .field("view", &self.view)
            .field("history", &self.history)
            .field("revision", &self.revision)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ShapeStore {
    /// Create an empty store with the select tool and the default view.
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            selected: None,
            tool: ToolKind::Select,
            view: ViewState::default(),
            history: HistoryLog::new(),
            gesture: None,
            revision: 0,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Replace the history log, e.g. to use a different capacity.
    pub fn with_history(mut self, history: HistoryLog) -> Self {
        self.history = history;
        self
    }

    // --- Reads ---

    /// Shapes in z-order (back to front).
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| &s.id == id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn selected_id(&self) -> Option<&ShapeId> {
        self.selected.as_ref()
    }

    /// The selected shape, if the selection refers to a shape that exists.
    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selected.as_ref().and_then(|id| self.shape(id))
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn zoom(&self) -> f64 {
        self.view.zoom
    }

    pub fn pan_offset(&self) -> Vec2 {
        self.view.offset
    }

    /// Monotonic counter of shape and view changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Notification ---

    /// Register an observer called after every effective mutation.
    pub fn subscribe(&mut self, observer: impl FnMut(StoreEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    fn emit(&mut self, event: StoreEvent) {
        if event.is_persisted() {
            self.revision += 1;
        }
        for (_, observer) in &mut self.observers {
            observer(event);
        }
    }

    // --- History ---

    /// Snapshot the shapes before a change, once per gesture.
    fn record_shapes(&mut self) {
        match self.gesture {
            Some(true) => {}
            Some(false) => {
                self.history.record(self.shapes.clone());
                self.gesture = Some(true);
            }
            None => self.history.record(self.shapes.clone()),
        }
    }

    /// Start coalescing shape changes into a single undo step.
    pub fn begin_gesture(&mut self) {
        if self.gesture.is_none() {
            self.gesture = Some(false);
        }
    }

    /// Stop coalescing; the next change records its own undo step.
    pub fn end_gesture(&mut self) {
        self.gesture = None;
    }

    /// Restore the previous shape collection. Selection, tool and view are untouched.
    pub fn undo(&mut self) -> bool {
        self.gesture = None;
        match self.history.undo(self.shapes.clone()) {
            Some(previous) => {
                self.shapes = previous;
                log::debug!("Undo ({} shapes)", self.shapes.len());
                self.emit(StoreEvent::ShapesChanged);
                true
            }
            None => false,
        }
    }

    /// Re-apply the last undone shape collection.
    pub fn redo(&mut self) -> bool {
        self.gesture = None;
        match self.history.redo(self.shapes.clone()) {
            Some(next) => {
                self.shapes = next;
                log::debug!("Redo ({} shapes)", self.shapes.len());
                self.emit(StoreEvent::ShapesChanged);
                true
            }
            None => false,
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    // --- Shape mutations ---

    /// Append a shape on top, select it and switch back to the select tool.
    pub fn add_shape(&mut self, shape: Shape) {
        self.record_shapes();
        log::debug!("Add {} {}", shape.kind.name(), shape.id);
        let id = shape.id.clone();
        self.shapes.push(shape);
        self.emit(StoreEvent::ShapesChanged);
        self.select_internal(Some(id));
        if self.tool != ToolKind::Select {
            self.tool = ToolKind::Select;
            self.emit(StoreEvent::ToolChanged);
        }
    }

    /// Replace the shape with the same id in place. No-op if the id is absent.
    pub fn update_shape(&mut self, shape: Shape) {
        let Some(index) = self.shapes.iter().position(|s| s.id == shape.id) else {
            return;
        };
        if self.shapes[index] == shape {
            return;
        }
        self.record_shapes();
        self.shapes[index] = shape;
        self.emit(StoreEvent::ShapesChanged);
    }

    /// Remove a shape; clears the selection iff it was the selected one.
    pub fn delete_shape(&mut self, id: &ShapeId) {
        let Some(index) = self.shapes.iter().position(|s| &s.id == id) else {
            return;
        };
        self.record_shapes();
        let removed = self.shapes.remove(index);
        log::debug!("Delete {} {}", removed.kind.name(), removed.id);
        self.emit(StoreEvent::ShapesChanged);
        if self.selected.as_ref() == Some(id) {
            self.select_internal(None);
        }
    }

    /// Clone the selected shape at [`DUPLICATE_OFFSET`] and select the clone.
    ///
    /// Returns the new shape's id, or `None` if nothing is selected.
    pub fn duplicate_selected(&mut self) -> Option<ShapeId> {
        let copy = self.selected_shape()?.duplicate(DUPLICATE_OFFSET);
        let id = copy.id.clone();
        self.record_shapes();
        self.shapes.push(copy);
        self.emit(StoreEvent::ShapesChanged);
        self.select_internal(Some(id.clone()));
        Some(id)
    }

    /// Change the fill of the selected shape only. No-op without a selection.
    pub fn set_fill_of_selected(&mut self, fill: &str) {
        let Some(id) = self.selected.clone() else {
            return;
        };
        let Some(index) = self.shapes.iter().position(|s| s.id == id) else {
            return;
        };
        if self.shapes[index].fill == fill {
            return;
        }
        self.record_shapes();
        self.shapes[index].fill = fill.to_string();
        self.emit(StoreEvent::ShapesChanged);
    }

    /// Replace the entire shape collection, keeping it undoable.
    pub fn replace_all_shapes(&mut self, shapes: Vec<Shape>) {
        self.record_shapes();
        self.shapes = shapes;
        self.emit(StoreEvent::ShapesChanged);
    }

    // --- UI state ---

    fn select_internal(&mut self, id: Option<ShapeId>) {
        if self.selected != id {
            self.selected = id;
            self.emit(StoreEvent::SelectionChanged);
        }
    }

    pub fn set_selection(&mut self, id: Option<ShapeId>) {
        self.select_internal(id);
    }

    /// Switch tools. Any drawing tool clears the selection.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.tool != tool {
            self.tool = tool;
            log::info!("Tool: {}", tool.name());
            self.emit(StoreEvent::ToolChanged);
        }
        if tool != ToolKind::Select {
            self.select_internal(None);
        }
    }

    /// Set the zoom level, clamped to the supported range.
    ///
    /// Non-finite or non-positive values are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if !zoom.is_finite() || zoom <= 0.0 {
            log::warn!("Ignoring invalid zoom {zoom}");
            return;
        }
        let zoom = clamp_zoom(zoom);
        if self.view.zoom != zoom {
            self.view.zoom = zoom;
            self.emit(StoreEvent::ViewChanged);
        }
    }

    pub fn set_pan_offset(&mut self, offset: Vec2) {
        if !offset.is_finite() {
            log::warn!("Ignoring invalid pan offset {offset:?}");
            return;
        }
        if self.view.offset != offset {
            self.view.offset = offset;
            self.emit(StoreEvent::ViewChanged);
        }
    }

    /// Set zoom and offset together with a single notification.
    pub fn set_view(&mut self, view: ViewState) {
        if !view.zoom.is_finite() || view.zoom <= 0.0 || !view.offset.is_finite() {
            log::warn!("Ignoring invalid view {view:?}");
            return;
        }
        let view = ViewState::new(clamp_zoom(view.zoom), view.offset);
        if self.view != view {
            self.view = view;
            self.emit(StoreEvent::ViewChanged);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MAX_UNDO_HISTORY;
    use crate::shapes::ShapeKind;
    use kurbo::Point;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn shape(id: &str) -> Shape {
        Shape::new(ShapeKind::Rectangle, Point::new(100.0, 100.0), 50.0, 50.0)
            .with_id(id)
            .with_fill("#f00")
    }

    fn record_events(store: &mut ShapeStore) -> Rc<RefCell<Vec<StoreEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        store.subscribe(move |event| sink.borrow_mut().push(event));
        events
    }

    #[test]
    fn test_add_selects_and_resets_tool() {
        let mut store = ShapeStore::new();
        store.set_tool(ToolKind::Rectangle);
        store.add_shape(shape("1"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.selected_id().map(ShapeId::as_str), Some("1"));
        assert_eq!(store.tool(), ToolKind::Select);
    }

    #[test]
    fn test_add_goes_on_top() {
        let mut store = ShapeStore::new();
        store.add_shape(shape("1"));
        store.add_shape(shape("2"));
        assert_eq!(store.shapes()[1].id.as_str(), "2");
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut store = ShapeStore::new();
        store.add_shape(shape("1"));
        store.add_shape(shape("2"));
        let mut moved = shape("1");
        moved.x = 10.0;
        store.update_shape(moved);
        assert_eq!(store.shapes()[0].x, 10.0);
        assert_eq!(store.shapes()[0].id.as_str(), "1");
    }

    #[test]
    fn test_update_missing_id_is_noop() {
        let mut store = ShapeStore::new();
        store.add_shape(shape("1"));
        let revision = store.revision();
        let depth = store.history().undo_depth();
        store.update_shape(shape("nope"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.revision(), revision);
        assert_eq!(store.history().undo_depth(), depth);
    }

    #[test]
    fn test_replace_all_shapes() {
        let mut store = ShapeStore::new();
        store.add_shape(shape("1"));
        store.replace_all_shapes(vec![shape("2"), shape("3")]);
        let ids: Vec<_> = store.shapes().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["2", "3"]);

        store.replace_all_shapes(Vec::new());
        assert!(store.is_empty());
    }

    #[test]
    fn test_duplicate_offsets_and_selects() {
        let mut store = ShapeStore::new();
        store.add_shape(shape("1"));
        let new_id = store.duplicate_selected().unwrap();

        assert_eq!(store.len(), 2);
        let copy = &store.shapes()[1];
        assert_eq!((copy.x, copy.y, copy.width, copy.height), (120.0, 120.0, 50.0, 50.0));
        assert_eq!(copy.fill, "#f00");
        assert_ne!(copy.id.as_str(), "1");
        assert_eq!(store.selected_id(), Some(&new_id));
    }

    #[test]
    fn test_duplicate_without_selection() {
        let mut store = ShapeStore::new();
        assert!(store.duplicate_selected().is_none());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_delete_selected_clears_selection() {
        let mut store = ShapeStore::new();
        store.add_shape(shape("1"));
        store.delete_shape(&ShapeId::from("1"));
        assert!(store.is_empty());
        assert!(store.selected_id().is_none());
    }

    #[test]
    fn test_delete_other_keeps_selection() {
        let mut store = ShapeStore::new();
        store.add_shape(shape("1"));
        store.add_shape(shape("2"));
        store.set_selection(Some(ShapeId::from("1")));
        store.delete_shape(&ShapeId::from("2"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.selected_id().map(ShapeId::as_str), Some("1"));
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut store = ShapeStore::new();
        store.add_shape(shape("1"));
        store.delete_shape(&ShapeId::from("ghost"));
        assert_eq!(store.len(), 1);
        assert!(store.selected_id().is_some());
    }

    #[test]
    fn test_set_fill_only_selected() {
        let mut store = ShapeStore::new();
        store.add_shape(shape("1"));
        store.add_shape(shape("2").with_fill("#0f0"));
        store.set_selection(Some(ShapeId::from("1")));
        store.set_fill_of_selected("#00f");
        assert_eq!(store.shapes()[0].fill, "#00f");
        assert_eq!(store.shapes()[1].fill, "#0f0");
    }

    #[test]
    fn test_set_fill_without_selection() {
        let mut store = ShapeStore::new();
        store.add_shape(shape("1"));
        store.set_selection(None);
        store.set_fill_of_selected("#00f");
        assert_eq!(store.shapes()[0].fill, "#f00");
    }

    #[test]
    fn test_drawing_tool_clears_selection() {
        let mut store = ShapeStore::new();
        store.add_shape(shape("1"));
        store.set_tool(ToolKind::Select);
        assert!(store.selected_id().is_some());
        store.set_tool(ToolKind::Ellipse);
        assert!(store.selected_id().is_none());
        assert_eq!(store.tool(), ToolKind::Ellipse);
    }

    #[test]
    fn test_undo_add_and_redo() {
        let mut store = ShapeStore::new();
        store.add_shape(shape("1"));
        assert!(store.undo());
        assert!(store.is_empty());
        assert!(store.redo());
        assert_eq!(store.len(), 1);
        assert_eq!(store.shapes()[0].id.as_str(), "1");
    }

    #[test]
    fn test_undo_leaves_view_and_selection() {
        let mut store = ShapeStore::new();
        store.add_shape(shape("1"));
        store.set_zoom(2.0);
        store.set_pan_offset(Vec2::new(5.0, 6.0));
        store.undo();
        assert_eq!(store.zoom(), 2.0);
        assert_eq!(store.pan_offset(), Vec2::new(5.0, 6.0));
        // Selection is not rolled back even though the shape is gone.
        assert_eq!(store.selected_id().map(ShapeId::as_str), Some("1"));
        assert!(store.selected_shape().is_none());
    }

    #[test]
    fn test_view_changes_are_not_undoable() {
        let mut store = ShapeStore::new();
        store.set_zoom(3.0);
        store.set_tool(ToolKind::Rectangle);
        assert!(!store.can_undo());
    }

    #[test]
    fn test_history_depth_bounded() {
        let mut store = ShapeStore::new();
        for i in 0..(MAX_UNDO_HISTORY + 20) {
            store.add_shape(shape(&i.to_string()));
        }
        assert_eq!(store.history().undo_depth(), MAX_UNDO_HISTORY);
        let mut undone = 0;
        while store.undo() {
            undone += 1;
        }
        assert_eq!(undone, MAX_UNDO_HISTORY);
        assert_eq!(store.len(), 20);
    }

    #[test]
    fn test_custom_history_capacity() {
        let mut store = ShapeStore::new().with_history(HistoryLog::with_capacity(3));
        for i in 0..5 {
            store.add_shape(shape(&i.to_string()));
        }
        assert_eq!(store.history().undo_depth(), 3);
        while store.undo() {}
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_gesture_is_one_undo_step() {
        let mut store = ShapeStore::new();
        store.add_shape(shape("1"));
        store.begin_gesture();
        for step in 1..=5 {
            let mut moved = shape("1");
            moved.x = 100.0 + step as f64;
            store.update_shape(moved);
        }
        store.end_gesture();
        assert_eq!(store.shapes()[0].x, 105.0);
        assert!(store.undo());
        assert_eq!(store.shapes()[0].x, 100.0);
        assert!(store.undo());
        assert!(store.is_empty());
    }

    #[test]
    fn test_observers_notified_synchronously() {
        let mut store = ShapeStore::new();
        let events = record_events(&mut store);
        store.set_tool(ToolKind::Rectangle);
        store.add_shape(shape("1"));
        assert_eq!(
            *events.borrow(),
            [
                StoreEvent::ToolChanged,
                StoreEvent::ShapesChanged,
                StoreEvent::SelectionChanged,
                StoreEvent::ToolChanged,
            ]
        );
    }

    #[test]
    fn test_noops_do_not_notify() {
        let mut store = ShapeStore::new();
        let events = record_events(&mut store);
        store.set_selection(None);
        store.set_tool(ToolKind::Select);
        store.set_zoom(1.0);
        store.set_pan_offset(Vec2::ZERO);
        store.set_fill_of_selected("#000");
        store.delete_shape(&ShapeId::from("x"));
        assert!(store.duplicate_selected().is_none());
        assert!(!store.undo());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_unsubscribe() {
        let mut store = ShapeStore::new();
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let id = store.subscribe(move |_| *sink.borrow_mut() += 1);
        store.set_zoom(2.0);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set_zoom(3.0);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_zoom_is_clamped_and_validated() {
        let mut store = ShapeStore::new();
        store.set_zoom(50.0);
        assert_eq!(store.zoom(), 5.0);
        store.set_zoom(0.0001);
        assert_eq!(store.zoom(), 0.1);
        store.set_zoom(f64::NAN);
        store.set_zoom(-1.0);
        assert_eq!(store.zoom(), 0.1);
    }

    #[test]
    fn test_revision_tracks_shape_and_view_changes() {
        let mut store = ShapeStore::new();
        let start = store.revision();
        store.set_tool(ToolKind::Ellipse);
        assert_eq!(store.revision(), start);
        store.set_pan_offset(Vec2::new(1.0, 1.0));
        assert_eq!(store.revision(), start + 1);
        store.add_shape(shape("1"));
        assert_eq!(store.revision(), start + 2);
    }
}
