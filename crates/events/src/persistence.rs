//! Durable notification persistence service.
//!
//! [`NotificationPersistence`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! and writes every user-addressed event of a known notification kind to the
//! `notifications` table. It runs as a long-lived background task and stops
//! when the bus sender is dropped.
//!
//! Failures are logged and swallowed: a lost notification never affects the
//! swap that produced it.

use slotswap_core::notification::is_valid_kind;
use slotswap_core::types::DbId;
use slotswap_db::models::notification::CreateNotification;
use slotswap_db::repositories::NotificationRepo;
use slotswap_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::PlatformEvent;

/// Background service that persists notifications to the database.
pub struct NotificationPersistence;

impl NotificationPersistence {
    /// Run the persistence loop until the channel closes.
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let Some(input) = Self::notification_for(&event) else {
                        continue;
                    };
                    match Self::persist(&pool, &input).await {
                        Ok(id) => tracing::debug!(
                            notification_id = id,
                            user_id = input.user_id,
                            kind = %input.kind,
                            "Notification stored"
                        ),
                        Err(e) => tracing::error!(
                            error = %e,
                            user_id = input.user_id,
                            kind = %input.kind,
                            "Failed to persist notification"
                        ),
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Notification persistence lagged, some notifications were not stored"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification persistence shutting down");
                    break;
                }
            }
        }
    }

    /// Map an event to a notification row.
    ///
    /// Returns `None` for events without a recipient or whose type is not a
    /// notification kind.
    pub fn notification_for(event: &PlatformEvent) -> Option<CreateNotification> {
        let user_id = event.recipient_user_id?;
        if !is_valid_kind(&event.event_type) {
            return None;
        }
        Some(CreateNotification {
            user_id,
            kind: event.event_type.clone(),
            title: event
                .title
                .clone()
                .unwrap_or_else(|| event.event_type.clone()),
            message: event.message.clone().unwrap_or_default(),
            data: event.payload.clone(),
        })
    }

    async fn persist(pool: &DbPool, input: &CreateNotification) -> Result<DbId, sqlx::Error> {
        NotificationRepo::create(pool, input).await
    }
}
