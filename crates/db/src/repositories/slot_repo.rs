//! Repository for the `slots` table.
//!
//! Status writes are conditional on the status the caller observed
//! (`WHERE status_id = $expected`), which makes every one of them a
//! compare-and-set under Postgres row locking.

use slotswap_core::slot::SlotStatus;
use slotswap_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::slot::{CreateSlot, Slot, UpdateSlot};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, title, start_time, end_time, status_id, created_at, updated_at";

/// Provides data access for calendar slots.
pub struct SlotRepo;

impl SlotRepo {
    /// Insert a new slot owned by `owner_id` with the given initial status.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        owner_id: DbId,
        input: &CreateSlot,
        status: SlotStatus,
    ) -> Result<Slot, sqlx::Error> {
        let query = format!(
            "INSERT INTO slots (owner_id, title, start_time, end_time, status_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Slot>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(status.id())
            .fetch_one(executor)
            .await
    }

    /// Find a slot by ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Slot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM slots WHERE id = $1");
        sqlx::query_as::<_, Slot>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a slot by ID and hold its row lock until the transaction ends.
    pub async fn find_by_id_for_update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Slot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM slots WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Slot>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Fetch every slot whose ID is in `ids`.
    pub async fn find_many<'e>(
        executor: impl PgExecutor<'e>,
        ids: &[DbId],
    ) -> Result<Vec<Slot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM slots WHERE id = ANY($1)");
        sqlx::query_as::<_, Slot>(&query)
            .bind(ids)
            .fetch_all(executor)
            .await
    }

    /// List slots owned by a user, earliest first.
    pub async fn list_by_owner<'e>(
        executor: impl PgExecutor<'e>,
        owner_id: DbId,
    ) -> Result<Vec<Slot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM slots WHERE owner_id = $1 ORDER BY start_time, id"
        );
        sqlx::query_as::<_, Slot>(&query)
            .bind(owner_id)
            .fetch_all(executor)
            .await
    }

    /// List offered slots belonging to anyone but `excluding_owner`, earliest first.
    pub async fn list_offered<'e>(
        executor: impl PgExecutor<'e>,
        excluding_owner: DbId,
    ) -> Result<Vec<Slot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM slots \
             WHERE status_id = $1 AND owner_id <> $2 \
             ORDER BY start_time, id"
        );
        sqlx::query_as::<_, Slot>(&query)
            .bind(SlotStatus::Offered.id())
            .bind(excluding_owner)
            .fetch_all(executor)
            .await
    }

    /// Update a slot's descriptive fields. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no slot with `id` is owned by `owner_id`.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        owner_id: DbId,
        input: &UpdateSlot,
    ) -> Result<Option<Slot>, sqlx::Error> {
        let query = format!(
            "UPDATE slots SET
                title = COALESCE($3, title),
                start_time = COALESCE($4, start_time),
                end_time = COALESCE($5, end_time)
             WHERE id = $1 AND owner_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Slot>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&input.title)
            .bind(input.start_time)
            .bind(input.end_time)
            .fetch_optional(executor)
            .await
    }

    /// Set `status` to `next` only if it currently equals `expected`.
    ///
    /// Returns `true` if the row was updated.
    pub async fn compare_and_set_status<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        expected: SlotStatus,
        next: SlotStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE slots SET status_id = $3 WHERE id = $1 AND status_id = $2")
            .bind(id)
            .bind(expected.id())
            .bind(next.id())
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hand a slot to `new_owner` with status `next`, conditional on both the
    /// current owner and the current status.
    ///
    /// Returns `true` if the row was updated.
    pub async fn transfer<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        expected_owner: DbId,
        new_owner: DbId,
        expected: SlotStatus,
        next: SlotStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE slots SET owner_id = $3, status_id = $5 \
             WHERE id = $1 AND owner_id = $2 AND status_id = $4",
        )
        .bind(id)
        .bind(expected_owner)
        .bind(new_owner)
        .bind(expected.id())
        .bind(next.id())
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a slot owned by `owner_id` whose status is still `expected`.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete_if_status<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        owner_id: DbId,
        expected: SlotStatus,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM slots WHERE id = $1 AND owner_id = $2 AND status_id = $3")
                .bind(id)
                .bind(owner_id)
                .bind(expected.id())
                .execute(executor)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
