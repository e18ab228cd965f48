//! Repository for the `swap_requests` table.
//!
//! Requests are never deleted; the only mutation after insert is the single
//! `PENDING -> ACCEPTED | REJECTED` status change.

use std::collections::HashMap;

use slotswap_core::swap::SwapStatus;
use slotswap_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::slot::Slot;
use crate::models::swap_request::{NewSwapRequest, SwapRequest, SwapRequestDetail};
use crate::repositories::SlotRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, requester_id, responder_id, my_slot_id, their_slot_id, status_id, \
                       created_at, updated_at";

/// Provides data access for swap requests.
pub struct SwapRequestRepo;

impl SwapRequestRepo {
    /// Insert a new pending request.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &NewSwapRequest,
    ) -> Result<SwapRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO swap_requests (requester_id, responder_id, my_slot_id, their_slot_id, status_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SwapRequest>(&query)
            .bind(input.requester_id)
            .bind(input.responder_id)
            .bind(input.my_slot_id)
            .bind(input.their_slot_id)
            .bind(SwapStatus::Pending.id())
            .fetch_one(executor)
            .await
    }

    /// Find a request by ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<SwapRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM swap_requests WHERE id = $1");
        sqlx::query_as::<_, SwapRequest>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Move a request from `expected` to `next`.
    ///
    /// Returns the updated row, or `None` if the request is not in `expected`.
    pub async fn compare_and_set_status<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        expected: SwapStatus,
        next: SwapStatus,
    ) -> Result<Option<SwapRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE swap_requests SET status_id = $3
             WHERE id = $1 AND status_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SwapRequest>(&query)
            .bind(id)
            .bind(expected.id())
            .bind(next.id())
            .fetch_optional(executor)
            .await
    }

    /// List requests where `user_id` is the responder, newest first.
    pub async fn list_incoming<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
    ) -> Result<Vec<SwapRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM swap_requests \
             WHERE responder_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, SwapRequest>(&query)
            .bind(user_id)
            .fetch_all(executor)
            .await
    }

    /// List requests where `user_id` is the requester, newest first.
    pub async fn list_outgoing<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
    ) -> Result<Vec<SwapRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM swap_requests \
             WHERE requester_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, SwapRequest>(&query)
            .bind(user_id)
            .fetch_all(executor)
            .await
    }

    /// Attach the referenced slots to each request with one extra query.
    pub async fn with_slots(
        pool: &PgPool,
        requests: Vec<SwapRequest>,
    ) -> Result<Vec<SwapRequestDetail>, sqlx::Error> {
        let ids: Vec<DbId> = requests
            .iter()
            .flat_map(|r| [r.my_slot_id, r.their_slot_id])
            .collect();
        let slots: HashMap<DbId, Slot> = SlotRepo::find_many(pool, &ids)
            .await?
            .into_iter()
            .map(|slot| (slot.id, slot))
            .collect();

        Ok(requests
            .into_iter()
            .map(|request| SwapRequestDetail {
                my_slot: slots.get(&request.my_slot_id).cloned(),
                their_slot: slots.get(&request.their_slot_id).cloned(),
                request,
            })
            .collect())
    }
}
