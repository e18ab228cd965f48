//! Postgres-backed [`SlotStore`].
//!
//! Each [`UnitOfWork`] wraps one `sqlx` transaction at the default
//! `READ COMMITTED` level. Conditional `UPDATE`s re-check their `WHERE`
//! clause after waiting on a concurrent writer's row lock, so two
//! transactions racing for the same slot cannot both succeed.

use async_trait::async_trait;
use slotswap_core::slot::SlotStatus;
use slotswap_core::swap::SwapStatus;
use slotswap_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use super::{SlotStore, StoreResult, UnitOfWork};
use crate::models::slot::{CreateSlot, Slot, UpdateSlot};
use crate::models::swap_request::{NewSwapRequest, SwapRequest, SwapRequestLists};
use crate::repositories::{SlotRepo, SwapRequestRepo};

/// [`SlotStore`] over a Postgres connection pool.
#[derive(Clone)]
pub struct PgSlotStore {
    pool: PgPool,
}

impl PgSlotStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SlotStore for PgSlotStore {
    async fn insert_slot(
        &self,
        owner_id: DbId,
        input: &CreateSlot,
        status: SlotStatus,
    ) -> StoreResult<Slot> {
        SlotRepo::create(&self.pool, owner_id, input, status).await
    }

    async fn find_slot(&self, id: DbId) -> StoreResult<Option<Slot>> {
        SlotRepo::find_by_id(&self.pool, id).await
    }

    async fn list_owned(&self, owner_id: DbId) -> StoreResult<Vec<Slot>> {
        SlotRepo::list_by_owner(&self.pool, owner_id).await
    }

    async fn list_offered(&self, excluding_owner: DbId) -> StoreResult<Vec<Slot>> {
        SlotRepo::list_offered(&self.pool, excluding_owner).await
    }

    async fn find_request(&self, id: DbId) -> StoreResult<Option<SwapRequest>> {
        SwapRequestRepo::find_by_id(&self.pool, id).await
    }

    async fn list_requests(&self, user_id: DbId) -> StoreResult<SwapRequestLists> {
        let incoming = SwapRequestRepo::list_incoming(&self.pool, user_id).await?;
        let outgoing = SwapRequestRepo::list_outgoing(&self.pool, user_id).await?;

        Ok(SwapRequestLists {
            incoming: SwapRequestRepo::with_slots(&self.pool, incoming).await?,
            outgoing: SwapRequestRepo::with_slots(&self.pool, outgoing).await?,
        })
    }

    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

/// A unit of work backed by a Postgres transaction. Dropping it rolls back.
struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn lock_slot(&mut self, id: DbId) -> StoreResult<Option<Slot>> {
        SlotRepo::find_by_id_for_update(&mut *self.tx, id).await
    }

    async fn compare_and_set_status(
        &mut self,
        id: DbId,
        expected: SlotStatus,
        next: SlotStatus,
    ) -> StoreResult<bool> {
        SlotRepo::compare_and_set_status(&mut *self.tx, id, expected, next).await
    }

    async fn transfer_slot(
        &mut self,
        id: DbId,
        expected_owner: DbId,
        new_owner: DbId,
        expected: SlotStatus,
        next: SlotStatus,
    ) -> StoreResult<bool> {
        SlotRepo::transfer(&mut *self.tx, id, expected_owner, new_owner, expected, next).await
    }

    async fn update_slot(
        &mut self,
        id: DbId,
        owner_id: DbId,
        input: &UpdateSlot,
    ) -> StoreResult<Option<Slot>> {
        SlotRepo::update(&mut *self.tx, id, owner_id, input).await
    }

    async fn delete_slot(
        &mut self,
        id: DbId,
        owner_id: DbId,
        expected: SlotStatus,
    ) -> StoreResult<bool> {
        SlotRepo::delete_if_status(&mut *self.tx, id, owner_id, expected).await
    }

    async fn insert_request(&mut self, input: &NewSwapRequest) -> StoreResult<SwapRequest> {
        SwapRequestRepo::create(&mut *self.tx, input).await
    }

    async fn compare_and_set_request_status(
        &mut self,
        id: DbId,
        expected: SwapStatus,
        next: SwapStatus,
    ) -> StoreResult<Option<SwapRequest>> {
        SwapRequestRepo::compare_and_set_status(&mut *self.tx, id, expected, next).await
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await
    }
}
