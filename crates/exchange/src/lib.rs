//! Slot registry and swap negotiation.
//!
//! [`SlotRegistry`] owns the owner-driven slot lifecycle; [`SwapNegotiator`]
//! drives pairs of slots through propose, accept, and reject. Both run every
//! multi-record write through a [`UnitOfWork`](slotswap_db::store::UnitOfWork)
//! so that a slot is never left half-swapped.

pub mod error;
pub mod negotiator;
pub mod notify;
pub mod registry;

pub use error::{ExchangeError, ExchangeResult};
pub use negotiator::{ProposalPlan, SwapNegotiator};
pub use notify::{Notifier, SwapNotification};
pub use registry::SlotRegistry;
