//! In-process [`SlotStore`] for tests and database-free development.
//!
//! All tables sit behind one `tokio::sync::Mutex`. A [`UnitOfWork`] holds
//! the lock for its whole lifetime (single writer) and records the previous
//! version of every row it touches; if it is dropped without committing the
//! undo log is replayed in reverse.
//!
//! Callers must not use the store's own read methods while a unit of work is
//! open on the same task: the lock is not re-entrant.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use slotswap_core::slot::SlotStatus;
use slotswap_core::swap::SwapStatus;
use slotswap_core::types::DbId;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{SlotStore, StoreResult, UnitOfWork};
use crate::models::slot::{CreateSlot, Slot, UpdateSlot};
use crate::models::swap_request::{
    NewSwapRequest, SwapRequest, SwapRequestDetail, SwapRequestLists,
};

#[derive(Debug, Default)]
struct Tables {
    slots: BTreeMap<DbId, Slot>,
    requests: BTreeMap<DbId, SwapRequest>,
    last_slot_id: DbId,
    last_request_id: DbId,
}

impl Tables {
    fn detail(&self, request: &SwapRequest) -> SwapRequestDetail {
        SwapRequestDetail {
            request: request.clone(),
            my_slot: self.slots.get(&request.my_slot_id).cloned(),
            their_slot: self.slots.get(&request.their_slot_id).cloned(),
        }
    }

    fn requests_newest_first<F>(&self, mut keep: F) -> Vec<SwapRequestDetail>
    where
        F: FnMut(&SwapRequest) -> bool,
    {
        let mut matching: Vec<&SwapRequest> =
            self.requests.values().filter(|r| keep(r)).collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        matching.into_iter().map(|r| self.detail(r)).collect()
    }
}

fn by_start_time(slots: &mut [Slot]) {
    slots.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
}

/// [`SlotStore`] keeping all rows in memory.
#[derive(Clone, Default)]
pub struct MemorySlotStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All requests in insertion order. Intended for invariant checks in tests.
    pub async fn all_requests(&self) -> Vec<SwapRequest> {
        self.tables.lock().await.requests.values().cloned().collect()
    }

    /// All slots in insertion order. Intended for invariant checks in tests.
    pub async fn all_slots(&self) -> Vec<Slot> {
        self.tables.lock().await.slots.values().cloned().collect()
    }
}

#[async_trait]
impl SlotStore for MemorySlotStore {
    async fn insert_slot(
        &self,
        owner_id: DbId,
        input: &CreateSlot,
        status: SlotStatus,
    ) -> StoreResult<Slot> {
        let mut tables = self.tables.lock().await;
        tables.last_slot_id += 1;
        let now = Utc::now();
        let slot = Slot {
            id: tables.last_slot_id,
            owner_id,
            title: input.title.clone(),
            start_time: input.start_time,
            end_time: input.end_time,
            status,
            created_at: now,
            updated_at: now,
        };
        tables.slots.insert(slot.id, slot.clone());
        Ok(slot)
    }

    async fn find_slot(&self, id: DbId) -> StoreResult<Option<Slot>> {
        Ok(self.tables.lock().await.slots.get(&id).cloned())
    }

    async fn list_owned(&self, owner_id: DbId) -> StoreResult<Vec<Slot>> {
        let tables = self.tables.lock().await;
        let mut slots: Vec<Slot> = tables
            .slots
            .values()
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .collect();
        by_start_time(&mut slots);
        Ok(slots)
    }

    async fn list_offered(&self, excluding_owner: DbId) -> StoreResult<Vec<Slot>> {
        let tables = self.tables.lock().await;
        let mut slots: Vec<Slot> = tables
            .slots
            .values()
            .filter(|s| s.status == SlotStatus::Offered && s.owner_id != excluding_owner)
            .cloned()
            .collect();
        by_start_time(&mut slots);
        Ok(slots)
    }

    async fn find_request(&self, id: DbId) -> StoreResult<Option<SwapRequest>> {
        Ok(self.tables.lock().await.requests.get(&id).cloned())
    }

    async fn list_requests(&self, user_id: DbId) -> StoreResult<SwapRequestLists> {
        let tables = self.tables.lock().await;
        Ok(SwapRequestLists {
            incoming: tables.requests_newest_first(|r| r.responder_id == user_id),
            outgoing: tables.requests_newest_first(|r| r.requester_id == user_id),
        })
    }

    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        Ok(Box::new(MemoryUnitOfWork {
            tables: guard,
            undo: Vec::new(),
            committed: false,
        }))
    }
}

/// Previous version of a row touched inside a unit of work.
enum Undo {
    Slot(DbId, Option<Slot>),
    Request(DbId, Option<SwapRequest>),
}

struct MemoryUnitOfWork {
    tables: OwnedMutexGuard<Tables>,
    undo: Vec<Undo>,
    committed: bool,
}

impl MemoryUnitOfWork {
    /// Apply `change` to slot `id` if `condition` holds, recording the old row.
    fn update_slot_if<C, F>(&mut self, id: DbId, condition: C, change: F) -> bool
    where
        C: FnOnce(&Slot) -> bool,
        F: FnOnce(&mut Slot),
    {
        let Some(slot) = self.tables.slots.get_mut(&id) else {
            return false;
        };
        if !condition(slot) {
            return false;
        }
        self.undo.push(Undo::Slot(id, Some(slot.clone())));
        change(slot);
        slot.updated_at = Utc::now();
        true
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn lock_slot(&mut self, id: DbId) -> StoreResult<Option<Slot>> {
        Ok(self.tables.slots.get(&id).cloned())
    }

    async fn compare_and_set_status(
        &mut self,
        id: DbId,
        expected: SlotStatus,
        next: SlotStatus,
    ) -> StoreResult<bool> {
        Ok(self.update_slot_if(id, |s| s.status == expected, |s| s.status = next))
    }

    async fn transfer_slot(
        &mut self,
        id: DbId,
        expected_owner: DbId,
        new_owner: DbId,
        expected: SlotStatus,
        next: SlotStatus,
    ) -> StoreResult<bool> {
        Ok(self.update_slot_if(
            id,
            |s| s.owner_id == expected_owner && s.status == expected,
            |s| {
                s.owner_id = new_owner;
                s.status = next;
            },
        ))
    }

    async fn update_slot(
        &mut self,
        id: DbId,
        owner_id: DbId,
        input: &UpdateSlot,
    ) -> StoreResult<Option<Slot>> {
        let updated = self.update_slot_if(
            id,
            |s| s.owner_id == owner_id,
            |s| {
                if let Some(title) = &input.title {
                    s.title = title.clone();
                }
                if let Some(start_time) = input.start_time {
                    s.start_time = start_time;
                }
                if let Some(end_time) = input.end_time {
                    s.end_time = end_time;
                }
            },
        );
        Ok(updated.then(|| self.tables.slots.get(&id).cloned()).flatten())
    }

    async fn delete_slot(
        &mut self,
        id: DbId,
        owner_id: DbId,
        expected: SlotStatus,
    ) -> StoreResult<bool> {
        let matches = self
            .tables
            .slots
            .get(&id)
            .is_some_and(|s| s.owner_id == owner_id && s.status == expected);
        if !matches {
            return Ok(false);
        }
        let removed = self.tables.slots.remove(&id);
        self.undo.push(Undo::Slot(id, removed));
        Ok(true)
    }

    async fn insert_request(&mut self, input: &NewSwapRequest) -> StoreResult<SwapRequest> {
        self.tables.last_request_id += 1;
        let now = Utc::now();
        let request = SwapRequest {
            id: self.tables.last_request_id,
            requester_id: input.requester_id,
            responder_id: input.responder_id,
            my_slot_id: input.my_slot_id,
            their_slot_id: input.their_slot_id,
            status: SwapStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.undo.push(Undo::Request(request.id, None));
        self.tables.requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn compare_and_set_request_status(
        &mut self,
        id: DbId,
        expected: SwapStatus,
        next: SwapStatus,
    ) -> StoreResult<Option<SwapRequest>> {
        let Some(request) = self.tables.requests.get_mut(&id) else {
            return Ok(None);
        };
        if request.status != expected {
            return Ok(None);
        }
        let previous = request.clone();
        request.status = next;
        request.updated_at = Utc::now();
        let updated = request.clone();
        self.undo.push(Undo::Request(id, Some(previous)));
        Ok(Some(updated))
    }

    async fn commit(mut self: Box<Self>) -> StoreResult<()> {
        self.committed = true;
        self.undo.clear();
        Ok(())
    }
}

impl Drop for MemoryUnitOfWork {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        while let Some(entry) = self.undo.pop() {
            match entry {
                Undo::Slot(id, Some(slot)) => {
                    self.tables.slots.insert(id, slot);
                }
                Undo::Slot(id, None) => {
                    self.tables.slots.remove(&id);
                }
                Undo::Request(id, Some(request)) => {
                    self.tables.requests.insert(id, request);
                }
                Undo::Request(id, None) => {
                    self.tables.requests.remove(&id);
                }
            }
        }
    }
}
