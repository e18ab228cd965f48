//! Owner-driven slot lifecycle.
//!
//! The registry never starts or ends a negotiation. It refuses to touch the
//! status of a slot that is `SWAP_PENDING`, and every status write or delete
//! is conditional on the status observed when the request was checked.

use std::sync::Arc;

use slotswap_core::error::CoreError;
use slotswap_core::slot::{
    check_deletable, check_initial_status, check_owner_transition, validate_slot, SlotStatus,
};
use slotswap_core::types::DbId;
use slotswap_db::models::slot::{CreateSlot, Slot, UpdateSlot};
use slotswap_db::store::SlotStore;

use crate::error::ExchangeResult;

fn slot_not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: "slot", id }
}

/// Single source of truth for a slot's owner and exchange status.
#[derive(Clone)]
pub struct SlotRegistry {
    store: Arc<dyn SlotStore>,
}

impl SlotRegistry {
    pub fn new(store: Arc<dyn SlotStore>) -> Self {
        Self { store }
    }

    /// Create a slot owned by `owner_id`. Status defaults to `BUSY`.
    pub async fn create(&self, owner_id: DbId, input: CreateSlot) -> ExchangeResult<Slot> {
        let input = CreateSlot {
            title: input.title.trim().to_string(),
            ..input
        };
        validate_slot(&input.title, input.start_time, input.end_time)?;
        let status = input.status.unwrap_or(SlotStatus::Locked);
        check_initial_status(status)?;

        let slot = self.store.insert_slot(owner_id, &input, status).await?;
        tracing::info!(slot_id = slot.id, user_id = owner_id, status = %status, "Slot created");
        Ok(slot)
    }

    /// Edit a slot's title or window.
    ///
    /// Missing slots and slots owned by someone else are both reported as
    /// `NotFound`. The slot stays locked from the read to the write, so the
    /// merged window is validated against the row actually being updated.
    pub async fn update(
        &self,
        slot_id: DbId,
        requester: DbId,
        input: UpdateSlot,
    ) -> ExchangeResult<Slot> {
        let input = UpdateSlot {
            title: input.title.map(|t| t.trim().to_string()),
            ..input
        };

        let mut uow = self.store.begin().await?;
        let current = uow
            .lock_slot(slot_id)
            .await?
            .filter(|s| s.owner_id == requester)
            .ok_or_else(|| slot_not_found(slot_id))?;
        validate_slot(
            input.title.as_deref().unwrap_or(&current.title),
            input.start_time.unwrap_or(current.start_time),
            input.end_time.unwrap_or(current.end_time),
        )?;

        let slot = uow
            .update_slot(slot_id, requester, &input)
            .await?
            .ok_or_else(|| slot_not_found(slot_id))?;
        uow.commit().await?;
        tracing::info!(slot_id, user_id = requester, "Slot updated");
        Ok(slot)
    }

    /// Toggle a slot between `BUSY` and `SWAPPABLE`.
    pub async fn set_status(
        &self,
        slot_id: DbId,
        requester: DbId,
        next: SlotStatus,
    ) -> ExchangeResult<Slot> {
        let observed = self
            .store
            .find_slot(slot_id)
            .await?
            .ok_or_else(|| slot_not_found(slot_id))?;
        if observed.owner_id != requester {
            return Err(CoreError::Forbidden("Not your slot".into()).into());
        }
        check_owner_transition(observed.status, next)?;

        let mut uow = self.store.begin().await?;
        if !uow
            .compare_and_set_status(slot_id, observed.status, next)
            .await?
        {
            return Err(CoreError::Conflict("Slot status changed, please retry".into()).into());
        }
        // The slot may have been swapped away and come back to the same status.
        let slot = uow
            .lock_slot(slot_id)
            .await?
            .filter(|s| s.owner_id == requester)
            .ok_or_else(|| CoreError::Conflict("Slot ownership changed, please retry".into()))?;
        uow.commit().await?;

        tracing::info!(
            slot_id,
            user_id = requester,
            from = %observed.status,
            to = %next,
            "Slot status changed"
        );
        Ok(slot)
    }

    /// Slots owned by `owner_id`, earliest start first.
    pub async fn list_owned(&self, owner_id: DbId) -> ExchangeResult<Vec<Slot>> {
        Ok(self.store.list_owned(owner_id).await?)
    }

    /// Slots other users currently offer for exchange, earliest start first.
    pub async fn list_offered(&self, excluding_owner: DbId) -> ExchangeResult<Vec<Slot>> {
        Ok(self.store.list_offered(excluding_owner).await?)
    }

    /// Delete a slot that is not in negotiation.
    pub async fn delete(&self, slot_id: DbId, requester: DbId) -> ExchangeResult<()> {
        let observed = self
            .store
            .find_slot(slot_id)
            .await?
            .filter(|s| s.owner_id == requester)
            .ok_or_else(|| slot_not_found(slot_id))?;
        check_deletable(observed.status)?;

        let mut uow = self.store.begin().await?;
        if !uow
            .delete_slot(slot_id, requester, observed.status)
            .await?
        {
            return Err(CoreError::Conflict("Slot changed, please retry".into()).into());
        }
        uow.commit().await?;

        tracing::info!(slot_id, user_id = requester, "Slot deleted");
        Ok(())
    }

    /// Set a slot's status to `next` only if it is currently `expected`.
    pub async fn compare_and_set_status(
        &self,
        slot_id: DbId,
        expected: SlotStatus,
        next: SlotStatus,
    ) -> ExchangeResult<bool> {
        let mut uow = self.store.begin().await?;
        let swapped = uow.compare_and_set_status(slot_id, expected, next).await?;
        if swapped {
            uow.commit().await?;
        }
        Ok(swapped)
    }
}
