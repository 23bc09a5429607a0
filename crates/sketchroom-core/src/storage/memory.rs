//! In-memory storage implementation.

use super::{BoxFuture, Notification, Storage, StorageError, StorageResult, Subscription};
use crate::sync::{ElementPayload, StoredRow};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Mutex, RwLock};
use uuid::Uuid;

/// In-memory element store for testing and local replay.
///
/// Rows are kept in creation order. Subscribers whose receiver has been
/// dropped are pruned on the next notification.
#[derive(Default)]
pub struct MemoryStorage {
    rows: RwLock<Vec<StoredRow>>,
    subscribers: Mutex<Vec<(String, Sender<Notification>)>>,
    offline: AtomicBool,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with rows, kept in the given order.
    pub fn with_rows(rows: Vec<StoredRow>) -> Self {
        Self {
            rows: RwLock::new(rows),
            ..Self::default()
        }
    }

    /// Make every subsequent operation fail with [`StorageError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|subs| subs.len()).unwrap_or(0)
    }

    fn check_online(&self) -> StorageResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("memory store is offline".into()));
        }
        Ok(())
    }

    fn notify(&self, room_id: &str, notification: Notification) -> StorageResult<()> {
        let mut subs = self
            .subscribers
            .lock()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        subs.retain(|(room, tx)| room != room_id || tx.send(notification.clone()).is_ok());
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn insert(&self, room_id: &str, user_id: &str, payload: &ElementPayload) -> BoxFuture<'_, StorageResult<String>> {
        let row = StoredRow {
            id: Uuid::new_v4().to_string(),
            room_id: room_id.to_string(),
            user_id: user_id.to_string(),
            payload: payload.clone(),
        };
        Box::pin(async move {
            self.check_online()?;
            let value = serde_json::to_value(&row)?;
            {
                let mut rows = self
                    .rows
                    .write()
                    .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
                rows.push(row.clone());
            }
            self.notify(&row.room_id, Notification::Insert(value))?;
            Ok(row.id)
        })
    }

    fn update(&self, id: &str, payload: &ElementPayload) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let payload = payload.clone();
        Box::pin(async move {
            self.check_online()?;
            let row = {
                let mut rows = self
                    .rows
                    .write()
                    .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
                let row = rows
                    .iter_mut()
                    .find(|row| row.id == id)
                    .ok_or_else(|| StorageError::NotFound(id.clone()))?;
                row.payload = payload;
                row.clone()
            };
            let value = serde_json::to_value(&row)?;
            self.notify(&row.room_id, Notification::Update(value))
        })
    }

    fn delete_by_ids(&self, ids: &[String]) -> BoxFuture<'_, StorageResult<()>> {
        let ids = ids.to_vec();
        Box::pin(async move {
            self.check_online()?;
            let removed: Vec<StoredRow> = {
                let mut rows = self
                    .rows
                    .write()
                    .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
                let (removed, kept): (Vec<StoredRow>, Vec<StoredRow>) =
                    rows.drain(..).partition(|row| ids.contains(&row.id));
                *rows = kept;
                removed
            };
            for row in removed {
                self.notify(&row.room_id, Notification::Delete { id: row.id })?;
            }
            Ok(())
        })
    }

    fn query_all(&self, room_id: &str) -> BoxFuture<'_, StorageResult<Vec<StoredRow>>> {
        let room_id = room_id.to_string();
        Box::pin(async move {
            self.check_online()?;
            let rows = self
                .rows
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            Ok(rows.iter().filter(|row| row.room_id == room_id).cloned().collect())
        })
    }

    fn subscribe(&self, room_id: &str) -> StorageResult<Subscription> {
        self.check_online()?;
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?
            .push((room_id.to_string(), tx));
        Ok(Subscription::new(room_id, rx))
    }
}
