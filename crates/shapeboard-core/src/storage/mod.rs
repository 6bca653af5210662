//! Remote store abstraction for canvas persistence.
//!
//! The remote store holds exactly one [`PersistedSnapshot`]. Reads return it
//! (or nothing if it was never written); writes upsert it.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

use crate::document::PersistedSnapshot;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The document parsed but holds values the editor can't use.
    #[error("Invalid document: {0}")]
    Invalid(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Identifier the remote store assigned to the saved document.
pub type DocumentId = String;

/// Single-document remote store.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait RemoteStore: Send + Sync {
    /// Fetch the saved document, or `None` if nothing was ever written.
    fn read(&self) -> BoxFuture<'_, StorageResult<Option<PersistedSnapshot>>>;

    /// Insert or replace the saved document.
    fn write(&self, snapshot: &PersistedSnapshot) -> BoxFuture<'_, StorageResult<DocumentId>>;
}

/// Single-document remote store (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait RemoteStore {
    /// Fetch the saved document, or `None` if nothing was ever written.
    fn read(&self) -> BoxFuture<'_, StorageResult<Option<PersistedSnapshot>>>;

    /// Insert or replace the saved document.
    fn write(&self, snapshot: &PersistedSnapshot) -> BoxFuture<'_, StorageResult<DocumentId>>;
}

/// Simple blocking executor for tests.
#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {}
        }
    }
}
