//! Shapeboard Application
//!
//! The native application shell: windowing, input translation, GPU
//! presentation and scheduling of debounced saves.

mod app;
mod config;
mod event_handler;
mod shortcuts;

pub use app::{App, AppError, Editor};
pub use config::AppConfig;
pub use event_handler::{EventHandler, cursor_icon};
pub use shortcuts::{Shortcut, ShortcutRegistry};
