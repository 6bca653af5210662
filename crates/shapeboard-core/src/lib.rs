//! Shapeboard Core Library
//!
//! Platform-agnostic data structures and logic for the Shapeboard editor:
//! shapes and geometry, the shape store with undo history, the pointer
//! interaction state machine, and persistence to a remote store.

pub mod camera;
pub mod document;
pub mod geometry;
pub mod history;
pub mod input;
pub mod interaction;
pub mod selection;
pub mod shapes;
pub mod shortcuts;
pub mod storage;
pub mod store;
pub mod sync;
pub mod tools;

pub use camera::{MAX_ZOOM, MIN_ZOOM, ViewState};
pub use document::PersistedSnapshot;
pub use geometry::{
    hit_test_resize_handle, hit_test_shapes, normalize_shape, to_canvas_space, to_screen_space,
};
pub use history::{HistoryLog, MAX_UNDO_HISTORY};
pub use input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use interaction::{DragMode, Interaction, MIN_SHAPE_SIZE};
pub use selection::{Corner, CursorKind, HANDLE_SIZE, Handle, get_handles};
pub use shapes::{Shape, ShapeId, ShapeKind};
pub use shortcuts::{Command, command_for};
pub use storage::{DocumentId, MemoryStore, RemoteStore, StorageError, StorageResult};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStore;
pub use store::{ShapeStore, StoreEvent, SubscriptionId};
pub use sync::{LoadOutcome, SyncAdapter, SyncConfig};
pub use tools::ToolKind;
