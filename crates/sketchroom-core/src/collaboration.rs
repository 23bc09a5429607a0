//! Collaboration management: the bridge between the local element map and
//! the shared store.
//!
//! Local edits are queued as [`Outbound`] writes. Store acknowledgements,
//! write failures, hydration, and realtime notifications are queued as
//! [`SyncEvent`]s and applied to the document one at a time, so all
//! mutation of the element map stays on the caller's thread.

use crate::canvas::CanvasDocument;
use crate::rough::RoughStyle;
use crate::shapes::{CanvasElement, ElementId};
use crate::sync::{ElementPayload, Outbound, StoredRow, SyncEvent};
use std::collections::{HashMap, VecDeque};
use uuid::Uuid;

/// A change applied to the document by [`CollaborationManager::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum AppliedChange {
    /// A pending element received its stored id.
    Rekeyed { old: ElementId, new: ElementId },
    /// An element was inserted or replaced.
    Upserted(ElementId),
    /// An element was removed.
    Removed(ElementId),
}

/// Manages the write queue and inbound event queue for one room.
#[derive(Debug, Clone)]
pub struct CollaborationManager {
    room_id: String,
    user_id: String,
    /// Pending outgoing writes.
    outgoing: Vec<Outbound>,
    /// Inbound events, in arrival order.
    incoming: VecDeque<SyncEvent>,
    /// Inserts awaiting an id. The flag is set when the element was edited
    /// while the insert was in flight.
    in_flight: HashMap<Uuid, bool>,
    failed_writes: usize,
}

impl CollaborationManager {
    pub fn new(room_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            user_id: user_id.into(),
            outgoing: Vec::new(),
            incoming: VecDeque::new(),
            in_flight: HashMap::new(),
            failed_writes: 0,
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Author id attached to this client's inserts.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Number of writes that failed since creation.
    pub fn failed_writes(&self) -> usize {
        self.failed_writes
    }

    /// Number of inserts still waiting for a store id.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    // --- Outgoing ---

    /// Queue the insert of an element created under pending id `temp`.
    pub fn queue_insert(&mut self, temp: Uuid, element: &CanvasElement) {
        self.in_flight.insert(temp, false);
        self.outgoing.push(Outbound::Insert {
            temp,
            payload: ElementPayload::from_element(element),
        });
    }

    /// Queue an update. Edits to a still-pending element are deferred until
    /// its insert is acknowledged.
    pub fn queue_update(&mut self, id: &ElementId, element: &CanvasElement) {
        match id {
            ElementId::Stored(id) => self.outgoing.push(Outbound::Update {
                id: id.clone(),
                payload: ElementPayload::from_element(element),
            }),
            ElementId::Pending(temp) => {
                if let Some(dirty) = self.in_flight.get_mut(temp) {
                    *dirty = true;
                }
            }
        }
    }

    /// Queue one batched delete for the stored ids in `ids`. Pending ids are
    /// handled when their insert is acknowledged.
    pub fn queue_delete(&mut self, ids: &[ElementId]) {
        let ids: Vec<String> = ids.iter().filter_map(|id| id.stored().map(str::to_string)).collect();
        if !ids.is_empty() {
            self.outgoing.push(Outbound::Delete { ids });
        }
    }

    /// Take pending outgoing writes (drains the queue).
    pub fn take_outgoing(&mut self) -> Vec<Outbound> {
        std::mem::take(&mut self.outgoing)
    }

    /// Check if there are pending outgoing writes.
    pub fn has_outgoing(&self) -> bool {
        !self.outgoing.is_empty()
    }

    // --- Incoming ---

    /// Queue an inbound event.
    pub fn push_event(&mut self, event: SyncEvent) {
        self.incoming.push_back(event);
    }

    pub fn has_incoming(&self) -> bool {
        !self.incoming.is_empty()
    }

    /// Apply every queued inbound event to `doc`, in order.
    pub fn apply(&mut self, doc: &mut CanvasDocument, style: &RoughStyle) -> Vec<AppliedChange> {
        let mut changes = Vec::new();
        while let Some(event) = self.incoming.pop_front() {
            self.apply_event(event, doc, style, &mut changes);
        }
        changes
    }

    fn apply_event(
        &mut self,
        event: SyncEvent,
        doc: &mut CanvasDocument,
        style: &RoughStyle,
        changes: &mut Vec<AppliedChange>,
    ) {
        match event {
            SyncEvent::Hydrated(rows) => {
                log::info!("Hydrating room {} with {} row(s)", self.room_id, rows.len());
                for row in rows {
                    self.upsert_row(row, doc, style, changes);
                }
            }
            SyncEvent::Inserted { temp, id } => self.acknowledge(temp, id, doc, changes),
            SyncEvent::WriteFailed { temp, error } => {
                self.failed_writes += 1;
                if let Some(temp) = temp {
                    self.in_flight.remove(&temp);
                    log::warn!("Element pending:{temp} stays local only: {error}");
                }
            }
            SyncEvent::RemoteInsert(value) => {
                let Some(row) = self.decode(value) else {
                    return;
                };
                if row.user_id == self.user_id {
                    log::debug!("Ignoring echo of own insert {}", row.id);
                    return;
                }
                self.upsert_row(row, doc, style, changes);
            }
            SyncEvent::RemoteUpdate(value) => {
                let Some(row) = self.decode(value) else {
                    return;
                };
                let id = ElementId::Stored(row.id.clone());
                if !doc.contains(&id) {
                    log::debug!("Ignoring update of unknown element {id}");
                    return;
                }
                self.upsert_row(row, doc, style, changes);
            }
            SyncEvent::RemoteDelete { id } => {
                let id = ElementId::Stored(id);
                if doc.remove(&id).is_some() {
                    changes.push(AppliedChange::Removed(id));
                }
            }
        }
    }

    /// Re-key an acknowledged insert, or follow up on edits made while it
    /// was in flight.
    fn acknowledge(&mut self, temp: Uuid, id: String, doc: &mut CanvasDocument, changes: &mut Vec<AppliedChange>) {
        let dirty = self.in_flight.remove(&temp).unwrap_or(false);
        let old = ElementId::Pending(temp);
        let new = ElementId::Stored(id.clone());

        if !doc.rekey(&old, new.clone()) {
            log::debug!("Element {new} was deleted before its insert completed");
            self.outgoing.push(Outbound::Delete { ids: vec![id] });
            return;
        }
        if dirty {
            if let Some(element) = doc.get(&new) {
                self.outgoing.push(Outbound::Update {
                    id,
                    payload: ElementPayload::from_element(element),
                });
            }
        }
        changes.push(AppliedChange::Rekeyed { old, new });
    }

    fn decode(&self, value: serde_json::Value) -> Option<StoredRow> {
        match StoredRow::from_value(value) {
            Ok(row) if row.room_id == self.room_id => Some(row),
            Ok(row) => {
                log::debug!("Ignoring row {} from room {}", row.id, row.room_id);
                None
            }
            Err(e) => {
                log::warn!("Skipping malformed notification: {e}");
                None
            }
        }
    }

    fn upsert_row(&self, row: StoredRow, doc: &mut CanvasDocument, style: &RoughStyle, changes: &mut Vec<AppliedChange>) {
        match row.payload.to_element(style) {
            Ok(element) => {
                let id = ElementId::Stored(row.id);
                doc.insert(id.clone(), element);
                changes.push(AppliedChange::Upserted(id));
            }
            Err(e) => log::warn!("Skipping malformed row {}: {e}", row.id),
        }
    }
}
