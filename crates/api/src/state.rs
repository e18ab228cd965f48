use std::sync::Arc;

use slotswap_db::store::SlotStore;
use slotswap_events::EventBus;
use slotswap_exchange::{SlotRegistry, SwapNegotiator};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything inside is behind an `Arc` or is a pool handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (users and notifications).
    pub pool: slotswap_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Owner-driven slot operations.
    pub registry: SlotRegistry,
    /// Swap proposal and resolution.
    pub negotiator: SwapNegotiator,
}

impl AppState {
    /// Wire the registry and negotiator onto `store`, with notifications
    /// published on `event_bus`.
    pub fn new(
        pool: slotswap_db::DbPool,
        config: ServerConfig,
        store: Arc<dyn SlotStore>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            registry: SlotRegistry::new(Arc::clone(&store)),
            negotiator: SwapNegotiator::new(store, event_bus),
            pool,
            config: Arc::new(config),
        }
    }
}
