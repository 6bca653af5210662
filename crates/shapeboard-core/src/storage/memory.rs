//! In-memory remote store.

use super::{BoxFuture, DocumentId, RemoteStore, StorageError, StorageResult};
use crate::document::PersistedSnapshot;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

/// In-memory store for testing and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    document: RwLock<Option<(DocumentId, PersistedSnapshot)>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a saved document.
    pub fn with_snapshot(snapshot: PersistedSnapshot) -> Self {
        Self {
            document: RwLock::new(Some((Uuid::new_v4().to_string(), snapshot))),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// The saved document, without going through the async interface.
    pub fn current(&self) -> Option<PersistedSnapshot> {
        self.document
            .read()
            .ok()
            .and_then(|doc| doc.as_ref().map(|(_, snapshot)| snapshot.clone()))
    }
}

impl RemoteStore for MemoryStore {
    fn read(&self) -> BoxFuture<'_, StorageResult<Option<PersistedSnapshot>>> {
        Box::pin(async move {
            let doc = self
                .document
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            Ok(doc.as_ref().map(|(_, snapshot)| snapshot.clone()))
        })
    }

    fn write(&self, snapshot: &PersistedSnapshot) -> BoxFuture<'_, StorageResult<DocumentId>> {
        let snapshot = snapshot.clone();
        Box::pin(async move {
            let mut doc = self
                .document
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            let id = match doc.take() {
                Some((id, _)) => id,
                None => Uuid::new_v4().to_string(),
            };
            *doc = Some((id.clone(), snapshot));
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(id)
        })
    }
}
