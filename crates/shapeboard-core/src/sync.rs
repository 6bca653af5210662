//! Synchronization between the local store and the remote store.
//!
//! The adapter performs a one-shot initial load and then writes debounced
//! snapshots. Local edits are always authoritative: a load that resolves
//! after the user has started editing is discarded.

use crate::document::PersistedSnapshot;
use crate::geometry::normalize_shape;
use crate::storage::{DocumentId, RemoteStore, StorageResult};
use crate::store::ShapeStore;
use std::sync::Arc;
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Default quiet period before a change is written.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Sync adapter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Trailing-edge debounce window for writes.
    pub debounce: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    NotStarted,
    /// Read in flight.
    Pending,
    Done,
}

/// Proof that the initial load was started. Only one is ever issued.
#[derive(Debug)]
pub struct LoadTicket {
    _issued: (),
}

/// What the initial load did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Remote state replaced the local shapes and view.
    Applied,
    /// Nothing saved remotely.
    Empty,
    /// The load already happened (or is in flight).
    AlreadyLoaded,
    /// The store was edited before the read resolved.
    SkippedLocalEdits,
    /// The read failed or returned an unusable document; treated as no
    /// saved state.
    Failed,
}

/// Replace the store's shapes and view with a saved snapshot.
///
/// This is the raw apply step with no guard: calling it after local edits
/// overwrites them. [`SyncAdapter`] only calls it once, before any edit.
///
/// Shapes are normalized on the way in.
pub fn apply_snapshot(store: &mut ShapeStore, snapshot: &PersistedSnapshot) {
    store.replace_all_shapes(snapshot.shapes.iter().map(normalize_shape).collect());
    store.set_view(snapshot.view());
}

/// Loads once from, and writes debounced snapshots to, a [`RemoteStore`].
pub struct SyncAdapter<S: RemoteStore> {
    remote: Arc<S>,
    config: SyncConfig,
    load_state: LoadState,
    /// When the pending write becomes due.
    deadline: Option<Instant>,
    document_id: Option<DocumentId>,
}

impl<S: RemoteStore> SyncAdapter<S> {
    pub fn new(remote: Arc<S>) -> Self {
        Self::with_config(remote, SyncConfig::default())
    }

    pub fn with_config(remote: Arc<S>, config: SyncConfig) -> Self {
        Self {
            remote,
            config,
            load_state: LoadState::NotStarted,
            deadline: None,
            document_id: None,
        }
    }

    pub fn remote(&self) -> &Arc<S> {
        &self.remote
    }

    pub fn config(&self) -> SyncConfig {
        self.config
    }

    /// Whether the initial load finished, successfully or not. Writes are
    /// held back until then.
    pub fn is_ready(&self) -> bool {
        self.load_state == LoadState::Done
    }

    /// Id reported by the last successful write.
    pub fn document_id(&self) -> Option<&str> {
        self.document_id.as_deref()
    }

    // --- Initial load ---

    /// Start the initial load. Returns `None` if it was already started.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.load_state != LoadState::NotStarted {
            return None;
        }
        self.load_state = LoadState::Pending;
        Some(LoadTicket { _issued: () })
    }

    /// Complete the initial load with the result of the remote read.
    ///
    /// The snapshot is applied only to a store that has never had a shape
    /// or view change. Any earlier local edit wins over the saved state.
    pub fn finish_load(
        &mut self,
        store: &mut ShapeStore,
        _ticket: LoadTicket,
        result: StorageResult<Option<PersistedSnapshot>>,
    ) -> LoadOutcome {
        if self.load_state == LoadState::Done {
            return LoadOutcome::AlreadyLoaded;
        }
        self.load_state = LoadState::Done;

        let result = result.and_then(|snapshot| match snapshot {
            Some(snapshot) => snapshot.validate().map(|()| Some(snapshot)),
            None => Ok(None),
        });
        match result {
            Err(e) => {
                log::warn!("Failed to read saved canvas, starting empty: {}", e);
                LoadOutcome::Failed
            }
            Ok(None) => {
                log::info!("No saved canvas");
                LoadOutcome::Empty
            }
            Ok(Some(_)) if store.revision() != 0 => {
                log::info!("Discarding saved canvas: the canvas was already edited");
                LoadOutcome::SkippedLocalEdits
            }
            Ok(Some(snapshot)) => {
                apply_snapshot(store, &snapshot);
                store.clear_history();
                log::info!("Loaded saved canvas ({} shapes)", snapshot.shapes.len());
                LoadOutcome::Applied
            }
        }
    }

    /// Read the remote store and apply it, at most once.
    pub async fn load(&mut self, store: &mut ShapeStore) -> LoadOutcome {
        let Some(ticket) = self.begin_load() else {
            return LoadOutcome::AlreadyLoaded;
        };
        let result = self.remote.read().await;
        self.finish_load(store, ticket, result)
    }

    // --- Debounced writes ---

    /// Record a persisted-state change at `now`, pushing the write out.
    pub fn note_change(&mut self, now: Instant) {
        self.deadline = Some(now + self.config.debounce);
    }

    pub fn has_pending_write(&self) -> bool {
        self.deadline.is_some()
    }

    /// When the pending write is due, if one is pending and writes are allowed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline.filter(|_| self.is_ready())
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.next_deadline().is_some_and(|deadline| now >= deadline)
    }

    /// Write the current state now.
    ///
    /// Returns `Ok(None)` without writing before the initial load finishes.
    /// A failed write is not retried; the next change schedules a new one.
    pub async fn flush(&mut self, store: &ShapeStore) -> StorageResult<Option<DocumentId>> {
        if !self.is_ready() {
            return Ok(None);
        }
        self.deadline = None;
        let snapshot = PersistedSnapshot::capture(store);
        let id = self.remote.write(&snapshot).await?;
        log::debug!("Saved canvas {} ({} shapes)", id, snapshot.shapes.len());
        self.document_id = Some(id.clone());
        Ok(Some(id))
    }

    /// Write if the debounce window has elapsed.
    pub async fn flush_if_due(
        &mut self,
        store: &ShapeStore,
        now: Instant,
    ) -> StorageResult<Option<DocumentId>> {
        if !self.is_due(now) {
            return Ok(None);
        }
        self.flush(store).await
    }
}
