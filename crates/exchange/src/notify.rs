//! Fire-and-forget notification side channel.
//!
//! The negotiator calls [`Notifier::notify`] only after its unit of work has
//! committed. Implementations must not block and must not fail the caller.

use slotswap_core::types::DbId;
use slotswap_events::{EventBus, PlatformEvent};

/// A message for one user about a swap request.
#[derive(Debug, Clone)]
pub struct SwapNotification {
    /// Recipient.
    pub user_id: DbId,
    /// User whose action produced the notification.
    pub actor_id: DbId,
    pub swap_request_id: DbId,
    /// One of the kinds in [`slotswap_core::notification`].
    pub kind: &'static str,
    pub title: String,
    pub message: String,
    pub data: serde_json::Value,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: SwapNotification);
}

impl Notifier for EventBus {
    fn notify(&self, n: SwapNotification) {
        self.publish(
            PlatformEvent::new(n.kind)
                .with_source("swap_request", n.swap_request_id)
                .with_actor(n.actor_id)
                .with_recipient(n.user_id)
                .with_message(n.title, n.message)
                .with_payload(n.data),
        );
    }
}

#[cfg(test)]
mod tests {
    use slotswap_core::notification::KIND_SWAP_REQUEST;

    use super::*;

    #[tokio::test]
    async fn event_bus_publishes_addressed_event() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.notify(SwapNotification {
            user_id: 2,
            actor_id: 1,
            swap_request_id: 5,
            kind: KIND_SWAP_REQUEST,
            title: "New swap request".to_string(),
            message: "hello".to_string(),
            data: serde_json::json!({"swap_request_id": 5}),
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type, KIND_SWAP_REQUEST);
        assert_eq!(event.recipient_user_id, Some(2));
        assert_eq!(event.actor_user_id, Some(1));
        assert_eq!(event.source_entity_id, Some(5));
        assert_eq!(event.message.as_deref(), Some("hello"));
    }
}
