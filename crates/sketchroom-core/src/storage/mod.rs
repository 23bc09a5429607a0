//! Storage abstraction for the shared element store.

mod memory;

pub use memory::MemoryStorage;

use crate::sync::{ElementPayload, StoredRow};
use std::future::Future;
use std::pin::Pin;
use std::sync::mpsc::{Receiver, TryRecvError};
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Element not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Storage error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Change notification pushed to room subscribers.
///
/// Insert and update carry the full row as JSON so that a malformed row
/// from a remote writer fails at decode time, not at the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Insert(serde_json::Value),
    Update(serde_json::Value),
    Delete { id: String },
}

/// Receiving end of a room subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    room_id: String,
    receiver: Receiver<Notification>,
}

impl Subscription {
    pub fn new(room_id: impl Into<String>, receiver: Receiver<Notification>) -> Self {
        Self {
            room_id: room_id.into(),
            receiver,
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Next queued notification, if any. A closed channel yields `None`.
    pub fn try_recv(&self) -> Option<Notification> {
        match self.receiver.try_recv() {
            Ok(notification) => Some(notification),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::debug!("Subscription to room {} closed by the store", self.room_id);
                None
            }
        }
    }

    /// All queued notifications, in arrival order.
    pub fn drain(&self) -> Vec<Notification> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

/// Trait for element store backends.
///
/// The store assigns ids on insert and pushes a [`Notification`] to every
/// subscriber of the room after each successful write.
pub trait Storage: Send + Sync {
    /// Insert a new element. Returns the store-assigned id.
    fn insert(&self, room_id: &str, user_id: &str, payload: &ElementPayload) -> BoxFuture<'_, StorageResult<String>>;

    /// Overwrite the type and data of an existing element.
    fn update(&self, id: &str, payload: &ElementPayload) -> BoxFuture<'_, StorageResult<()>>;

    /// Delete elements by id. Unknown ids are ignored.
    fn delete_by_ids(&self, ids: &[String]) -> BoxFuture<'_, StorageResult<()>>;

    /// All rows of a room, oldest first.
    fn query_all(&self, room_id: &str) -> BoxFuture<'_, StorageResult<Vec<StoredRow>>>;

    /// Subscribe to change notifications for a room.
    fn subscribe(&self, room_id: &str) -> StorageResult<Subscription>;
}

#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    // Simple blocking executor for tests
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
        if let Poll::Ready(result) = f.as_mut().poll(&mut cx) {
            return result;
        }
    }
}
