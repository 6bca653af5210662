//! File-based remote store for native platforms.

use super::{BoxFuture, DocumentId, RemoteStore, StorageError, StorageResult};
use crate::document::PersistedSnapshot;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// On-disk envelope: the document plus the id it was first saved under.
#[derive(Serialize, Deserialize)]
struct StoredDocument {
    id: DocumentId,
    document: PersistedSnapshot,
}

/// Keeps the single saved document as a JSON file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store backed by the JSON file at `path`.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn new(path: PathBuf) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    StorageError::Io(format!("Failed to create storage directory: {}", e))
                })?;
            }
        }
        Ok(Self { path })
    }

    /// Create file storage in the default location.
    ///
    /// On Linux: `~/.local/share/shapeboard/canvas.json`
    /// On Windows: `%LOCALAPPDATA%\shapeboard\canvas.json`
    pub fn default_location() -> StorageResult<Self> {
        Self::new(Self::default_path()?)
    }

    /// Path used by [`FileStore::default_location`].
    pub fn default_path() -> StorageResult<PathBuf> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Ok(base.join("shapeboard").join("canvas.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StorageResult<Option<StoredDocument>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path).map_err(|e| {
            StorageError::Io(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        serde_json::from_str(&json).map(Some).map_err(|e| {
            StorageError::Serialization(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl RemoteStore for FileStore {
    fn read(&self) -> BoxFuture<'_, StorageResult<Option<PersistedSnapshot>>> {
        Box::pin(async move { Ok(self.load()?.map(|stored| stored.document)) })
    }

    fn write(&self, snapshot: &PersistedSnapshot) -> BoxFuture<'_, StorageResult<DocumentId>> {
        let snapshot = snapshot.clone();
        Box::pin(async move {
            // A corrupt file is replaced under a fresh id.
            let id = match self.load() {
                Ok(Some(existing)) => existing.id,
                Ok(None) => Uuid::new_v4().to_string(),
                Err(e) => {
                    log::warn!("Overwriting unreadable store file: {}", e);
                    Uuid::new_v4().to_string()
                }
            };
            let stored = StoredDocument {
                id: id.clone(),
                document: snapshot,
            };
            let json = serde_json::to_string_pretty(&stored)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            fs::write(&self.path, json).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {}", self.path.display(), e))
            })?;
            Ok(id)
        })
    }
}
