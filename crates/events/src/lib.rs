//! Slot exchange event bus and notification persistence.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`] -- the domain event envelope.
//! - [`NotificationPersistence`] -- background service that turns
//!   user-addressed events into rows of the `notifications` table.

pub mod bus;
pub mod persistence;

pub use bus::{EventBus, PlatformEvent};
pub use persistence::NotificationPersistence;
