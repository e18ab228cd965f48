//! Swap negotiation: propose, accept, reject.
//!
//! A proposal moves both slots `SWAPPABLE -> SWAP_PENDING` and inserts a
//! `PENDING` request in one unit of work. Resolution moves the request to a
//! terminal status and, in the same unit of work, either hands each slot to
//! the other party (`BUSY`) or puts both back on offer (`SWAPPABLE`).
//!
//! Every slot write is a compare-and-set on the status observed during the
//! precondition checks. If another caller got there first the unit of work is
//! dropped, nothing is written, and the caller gets `Conflict`.

use std::sync::Arc;

use slotswap_core::error::CoreError;
use slotswap_core::notification::{KIND_SWAP_ACCEPTED, KIND_SWAP_REJECTED, KIND_SWAP_REQUEST};
use slotswap_core::slot::SlotStatus;
use slotswap_core::swap::{
    check_owners_unchanged, check_proposal, check_resolution, Resolution, SwapStatus,
};
use slotswap_core::types::DbId;
use slotswap_db::models::slot::Slot;
use slotswap_db::models::swap_request::{NewSwapRequest, SwapRequest, SwapRequestLists};
use slotswap_db::store::{SlotStore, UnitOfWork};

use crate::error::ExchangeResult;
use crate::notify::{Notifier, SwapNotification};

/// A proposal whose preconditions held on the snapshot it was checked against.
///
/// Produced by [`SwapNegotiator::prepare_proposal`] and applied by
/// [`SwapNegotiator::commit_proposal`]. The snapshot may be stale by the time
/// it is committed; the commit re-checks everything it relies on.
#[derive(Debug, Clone)]
pub struct ProposalPlan {
    pub requester: DbId,
    pub my_slot: Slot,
    pub their_slot: Slot,
}

/// Drives pairs of slots through the swap lifecycle.
#[derive(Clone)]
pub struct SwapNegotiator {
    store: Arc<dyn SlotStore>,
    notifier: Arc<dyn Notifier>,
}

impl SwapNegotiator {
    pub fn new(store: Arc<dyn SlotStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Offer `my_slot_id` in exchange for `their_slot_id`.
    pub async fn propose(
        &self,
        requester: DbId,
        my_slot_id: DbId,
        their_slot_id: DbId,
    ) -> ExchangeResult<SwapRequest> {
        let plan = self
            .prepare_proposal(requester, my_slot_id, their_slot_id)
            .await?;
        self.commit_proposal(plan).await
    }

    /// Read both slots and check the proposal preconditions, in order:
    /// existence, ownership of `my_slot_id`, not swapping with oneself,
    /// both slots `SWAPPABLE`.
    pub async fn prepare_proposal(
        &self,
        requester: DbId,
        my_slot_id: DbId,
        their_slot_id: DbId,
    ) -> ExchangeResult<ProposalPlan> {
        let my_slot = self.find_slot(my_slot_id).await?;
        let their_slot = self.find_slot(their_slot_id).await?;
        check_proposal(requester, my_slot.state(), their_slot.state())?;

        Ok(ProposalPlan {
            requester,
            my_slot,
            their_slot,
        })
    }

    /// Lock both slots and create the pending request atomically.
    pub async fn commit_proposal(&self, plan: ProposalPlan) -> ExchangeResult<SwapRequest> {
        let ProposalPlan {
            requester,
            my_slot,
            their_slot,
        } = plan;
        let responder = their_slot.owner_id;

        let mut uow = self.store.begin().await?;
        let mut pair = [&my_slot, &their_slot];
        pair.sort_by_key(|slot| slot.id);
        for slot in pair {
            lock_for_negotiation(uow.as_mut(), slot).await?;
        }
        let request = uow
            .insert_request(&NewSwapRequest {
                requester_id: requester,
                responder_id: responder,
                my_slot_id: my_slot.id,
                their_slot_id: their_slot.id,
            })
            .await?;
        uow.commit().await?;

        tracing::info!(
            swap_request_id = request.id,
            user_id = requester,
            responder_id = responder,
            my_slot_id = my_slot.id,
            their_slot_id = their_slot.id,
            "Swap proposed"
        );

        self.notifier.notify(SwapNotification {
            user_id: responder,
            actor_id: requester,
            swap_request_id: request.id,
            kind: KIND_SWAP_REQUEST,
            title: "New swap request".to_string(),
            message: format!(
                "You have been offered \"{}\" in exchange for \"{}\"",
                my_slot.title, their_slot.title
            ),
            data: serde_json::json!({
                "swap_request_id": request.id,
                "my_slot_id": my_slot.id,
                "their_slot_id": their_slot.id,
            }),
        });

        Ok(request)
    }

    /// Accept or reject a pending request addressed to `responder`.
    pub async fn resolve(
        &self,
        responder: DbId,
        request_id: DbId,
        accept: bool,
    ) -> ExchangeResult<SwapRequest> {
        let request = self
            .store
            .find_request(request_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "swap_request",
                id: request_id,
            })?;
        check_resolution(responder, request.responder_id, request.status)?;

        let resolution = Resolution::from_accept(accept);
        let mut uow = self.store.begin().await?;
        let resolved = uow
            .compare_and_set_request_status(
                request_id,
                SwapStatus::Pending,
                resolution.request_status(),
            )
            .await?
            .ok_or_else(|| CoreError::InvalidState("Request is not pending".into()))?;

        match resolution {
            Resolution::Accept => exchange_owners(uow.as_mut(), &resolved).await?,
            Resolution::Reject => release_slots(uow.as_mut(), &resolved).await?,
        }
        uow.commit().await?;

        tracing::info!(
            swap_request_id = resolved.id,
            user_id = responder,
            requester_id = resolved.requester_id,
            status = %resolved.status,
            "Swap resolved"
        );

        let (kind, title, verb) = match resolution {
            Resolution::Accept => (KIND_SWAP_ACCEPTED, "Swap accepted", "accepted"),
            Resolution::Reject => (KIND_SWAP_REJECTED, "Swap rejected", "rejected"),
        };
        self.notifier.notify(SwapNotification {
            user_id: resolved.requester_id,
            actor_id: responder,
            swap_request_id: resolved.id,
            kind,
            title: title.to_string(),
            message: format!("Your swap request was {verb}"),
            data: serde_json::json!({
                "swap_request_id": resolved.id,
                "my_slot_id": resolved.my_slot_id,
                "their_slot_id": resolved.their_slot_id,
                "status": resolved.status,
            }),
        });

        Ok(resolved)
    }

    /// Requests addressed to and sent by `user_id`, newest first.
    pub async fn list_requests(&self, user_id: DbId) -> ExchangeResult<SwapRequestLists> {
        Ok(self.store.list_requests(user_id).await?)
    }

    async fn find_slot(&self, id: DbId) -> ExchangeResult<Slot> {
        Ok(self
            .store
            .find_slot(id)
            .await?
            .ok_or(CoreError::NotFound { entity: "slot", id })?)
    }
}

/// Slots are always locked lowest id first so that two units of work over
/// the same pair wait on each other instead of deadlocking.
fn ascending(a: DbId, b: DbId) -> (DbId, DbId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn lost_race() -> CoreError {
    CoreError::Conflict("Slot is no longer available, please retry".into())
}

/// `SWAPPABLE -> SWAP_PENDING` on `slot`, still held by the observed owner.
async fn lock_for_negotiation(uow: &mut dyn UnitOfWork, slot: &Slot) -> ExchangeResult<()> {
    if !uow
        .compare_and_set_status(slot.id, SlotStatus::Offered, SlotStatus::InNegotiation)
        .await?
    {
        return Err(lost_race().into());
    }
    // The status matched, but the slot may have changed hands in between.
    let current = uow.lock_slot(slot.id).await?.ok_or_else(lost_race)?;
    if current.owner_id != slot.owner_id {
        return Err(lost_race().into());
    }
    Ok(())
}

/// Give each party the other's slot, both ending `BUSY`.
async fn exchange_owners(uow: &mut dyn UnitOfWork, request: &SwapRequest) -> ExchangeResult<()> {
    let owner_changed = || CoreError::Conflict("Ownership changed, cannot accept".into());
    let (first, second) = ascending(request.my_slot_id, request.their_slot_id);
    let first = uow.lock_slot(first).await?.ok_or_else(owner_changed)?;
    let second = uow.lock_slot(second).await?.ok_or_else(owner_changed)?;
    let (mine, theirs) = if first.id == request.my_slot_id {
        (first, second)
    } else {
        (second, first)
    };
    check_owners_unchanged(
        request.requester_id,
        request.responder_id,
        mine.state(),
        theirs.state(),
    )?;

    let next = Resolution::Accept.slot_status();
    let moves = [
        (mine.id, request.requester_id, request.responder_id),
        (theirs.id, request.responder_id, request.requester_id),
    ];
    for (slot_id, from, to) in moves {
        if !uow
            .transfer_slot(slot_id, from, to, SlotStatus::InNegotiation, next)
            .await?
        {
            return Err(owner_changed().into());
        }
    }
    Ok(())
}

/// Put both slots back on offer.
async fn release_slots(uow: &mut dyn UnitOfWork, request: &SwapRequest) -> ExchangeResult<()> {
    let next = Resolution::Reject.slot_status();
    let (first, second) = ascending(request.my_slot_id, request.their_slot_id);
    for slot_id in [first, second] {
        if !uow
            .compare_and_set_status(slot_id, SlotStatus::InNegotiation, next)
            .await?
        {
            return Err(CoreError::Conflict(format!(
                "Slot {slot_id} is not in negotiation"
            ))
            .into());
        }
    }
    Ok(())
}
