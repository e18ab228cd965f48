//! Storage abstraction for slots and swap requests.
//!
//! [`SlotStore`] answers single-record reads and plain inserts. Every write
//! that must be atomic with another write goes through a [`UnitOfWork`]
//! obtained from [`SlotStore::begin`]: changes become visible to other
//! callers only on [`UnitOfWork::commit`], and a unit of work dropped
//! without committing is rolled back.
//!
//! Two backends are provided:
//!
//! - [`PgSlotStore`] -- one Postgres transaction per unit of work.
//! - [`MemorySlotStore`] -- a single-writer in-process store with an undo log.

use async_trait::async_trait;
use slotswap_core::slot::SlotStatus;
use slotswap_core::swap::SwapStatus;
use slotswap_core::types::DbId;

use crate::models::slot::{CreateSlot, Slot, UpdateSlot};
use crate::models::swap_request::{NewSwapRequest, SwapRequest, SwapRequestLists};

pub mod memory;
pub mod postgres;

pub use memory::MemorySlotStore;
pub use postgres::PgSlotStore;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, sqlx::Error>;

/// Read access and transaction entry point for slots and swap requests.
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Insert a new slot.
    async fn insert_slot(
        &self,
        owner_id: DbId,
        input: &CreateSlot,
        status: SlotStatus,
    ) -> StoreResult<Slot>;

    async fn find_slot(&self, id: DbId) -> StoreResult<Option<Slot>>;

    /// Slots owned by `owner_id`, earliest start first.
    async fn list_owned(&self, owner_id: DbId) -> StoreResult<Vec<Slot>>;

    /// Offered slots of every owner except `excluding_owner`, earliest start first.
    async fn list_offered(&self, excluding_owner: DbId) -> StoreResult<Vec<Slot>>;

    async fn find_request(&self, id: DbId) -> StoreResult<Option<SwapRequest>>;

    /// Incoming and outgoing requests for `user_id` with their slots, newest first.
    async fn list_requests(&self, user_id: DbId) -> StoreResult<SwapRequestLists>;

    /// Open a unit of work.
    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>>;
}

/// An all-or-nothing batch of reads and conditional writes.
///
/// Records read or written through a unit of work stay locked against other
/// units of work until it commits or is dropped.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Read a slot and lock it for the rest of the unit of work.
    async fn lock_slot(&mut self, id: DbId) -> StoreResult<Option<Slot>>;

    /// Set a slot's status to `next` only if it is currently `expected`.
    ///
    /// Returns `false` without mutating anything when the status differs
    /// or the slot does not exist.
    async fn compare_and_set_status(
        &mut self,
        id: DbId,
        expected: SlotStatus,
        next: SlotStatus,
    ) -> StoreResult<bool>;

    /// Give a slot to `new_owner` with status `next`, conditional on the
    /// current owner being `expected_owner` and the status being `expected`.
    async fn transfer_slot(
        &mut self,
        id: DbId,
        expected_owner: DbId,
        new_owner: DbId,
        expected: SlotStatus,
        next: SlotStatus,
    ) -> StoreResult<bool>;

    /// Apply descriptive field edits to a slot owned by `owner_id`.
    async fn update_slot(
        &mut self,
        id: DbId,
        owner_id: DbId,
        input: &UpdateSlot,
    ) -> StoreResult<Option<Slot>>;

    /// Delete a slot owned by `owner_id` whose status is still `expected`.
    async fn delete_slot(
        &mut self,
        id: DbId,
        owner_id: DbId,
        expected: SlotStatus,
    ) -> StoreResult<bool>;

    /// Insert a new `PENDING` request.
    async fn insert_request(&mut self, input: &NewSwapRequest) -> StoreResult<SwapRequest>;

    /// Move a request from `expected` to `next`, returning the updated row,
    /// or `None` when it is not in `expected`.
    async fn compare_and_set_request_status(
        &mut self,
        id: DbId,
        expected: SwapStatus,
        next: SwapStatus,
    ) -> StoreResult<Option<SwapRequest>>;

    /// Make every change of this unit of work visible atomically.
    async fn commit(self: Box<Self>) -> StoreResult<()>;
}
