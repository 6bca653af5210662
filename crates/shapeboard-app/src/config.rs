//! Application configuration.

use peniko::Color;
use shapeboard_core::SyncConfig;
use shapeboard_render::{RenderStyle, parse_color};
use std::path::PathBuf;
use std::time::Duration;

/// Overrides the location of the saved canvas.
pub const STORE_PATH_VAR: &str = "SHAPEBOARD_STORE_PATH";
/// Overrides the save debounce window, in milliseconds.
pub const SYNC_DEBOUNCE_VAR: &str = "SHAPEBOARD_SYNC_DEBOUNCE_MS";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Saved canvas location; `None` uses the platform data directory.
    pub store_path: Option<PathBuf>,
    pub sync: SyncConfig,
    pub style: RenderStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Shapeboard".to_string(),
            width: 1280,
            height: 800,
            store_path: None,
            sync: SyncConfig::default(),
            style: RenderStyle::default(),
        }
    }
}

impl AppConfig {
    /// Defaults with overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults with overrides from `lookup`. Unparseable values are logged
    /// and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup(STORE_PATH_VAR).filter(|p| !p.trim().is_empty()) {
            config.store_path = Some(PathBuf::from(path));
        }

        if let Some(raw) = lookup(SYNC_DEBOUNCE_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.sync.debounce = Duration::from_millis(ms),
                Err(e) => log::warn!("Ignoring {}={:?}: {}", SYNC_DEBOUNCE_VAR, raw, e),
            }
        }

        config
    }

    pub fn with_background(mut self, color: &str) -> Self {
        match parse_color(color) {
            Ok(c) => self.style.background = c,
            Err(e) => log::warn!("{}", e),
        }
        self
    }

    pub fn background_color(&self) -> Color {
        self.style.background
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config.title, "Shapeboard");
        assert_eq!((config.width, config.height), (1280, 800));
        assert!(config.store_path.is_none());
        assert_eq!(config.sync.debounce, Duration::from_millis(500));
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (STORE_PATH_VAR, "/tmp/board.json"),
            (SYNC_DEBOUNCE_VAR, " 250 "),
        ]));
        assert_eq!(config.store_path, Some(PathBuf::from("/tmp/board.json")));
        assert_eq!(config.sync.debounce, Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_overrides_ignored() {
        let config = AppConfig::from_lookup(lookup(&[
            (STORE_PATH_VAR, "  "),
            (SYNC_DEBOUNCE_VAR, "soon"),
        ]));
        assert!(config.store_path.is_none());
        assert_eq!(config.sync.debounce, Duration::from_millis(500));
    }

    #[test]
    fn test_with_background() {
        let config = AppConfig::default().with_background("#ffffff");
        assert_eq!(config.background_color(), Color::WHITE);

        let unchanged = AppConfig::default().with_background("white");
        assert_eq!(unchanged.background_color(), RenderStyle::default().background);
    }
}
