//! A canvas bound to a room of the shared store.

use crate::canvas::Canvas;
use crate::config::CanvasConfig;
use crate::storage::{Storage, StorageResult, Subscription};
use crate::sync::{SyncEvent, flush};
use std::sync::Arc;

/// Owns a canvas, the store it persists to, and the room subscription.
///
/// Dropping the session drops the subscription, which unsubscribes.
pub struct RoomSession {
    pub canvas: Canvas,
    storage: Arc<dyn Storage>,
    subscription: Subscription,
}

impl RoomSession {
    /// Subscribe to the room and hydrate the canvas with its current rows.
    ///
    /// The subscription is opened before the query so no change made in
    /// between is missed; rows seen twice are replaced in place.
    pub async fn open(
        storage: Arc<dyn Storage>,
        config: CanvasConfig,
        room_id: &str,
        user_id: &str,
    ) -> StorageResult<Self> {
        let subscription = storage.subscribe(room_id)?;
        let rows = storage.query_all(room_id).await?;
        log::info!("Joined room {room_id} as {user_id}");

        let mut canvas = Canvas::new(config, room_id, user_id);
        canvas.collaboration.push_event(SyncEvent::Hydrated(rows));
        canvas.apply_sync();

        Ok(Self {
            canvas,
            storage,
            subscription,
        })
    }

    pub fn room_id(&self) -> &str {
        self.subscription.room_id()
    }

    /// Flush queued writes, collect realtime notifications, and apply
    /// everything to the canvas. Returns true if the element map changed.
    pub async fn pump(&mut self) -> bool {
        let mut changed = false;
        loop {
            let ops = self.canvas.collaboration.take_outgoing();
            if !ops.is_empty() {
                let collab = &self.canvas.collaboration;
                let events = flush(self.storage.as_ref(), collab.room_id(), collab.user_id(), ops).await;
                for event in events {
                    self.canvas.collaboration.push_event(event);
                }
            }
            for notification in self.subscription.drain() {
                self.canvas.collaboration.push_event(notification.into());
            }
            changed |= self.canvas.apply_sync();

            // Acknowledgements can queue follow-up writes; those never queue more.
            if !self.canvas.collaboration.has_outgoing() {
                return changed;
            }
        }
    }

    /// Leave the room.
    pub fn close(self) {
        log::info!("Leaving room {}", self.subscription.room_id());
    }
}
