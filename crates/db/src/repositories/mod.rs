//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Methods that may run inside a transaction accept any [`sqlx::PgExecutor`],
//! so callers pass either `&PgPool` or `&mut *tx`.

pub mod notification_repo;
pub mod slot_repo;
pub mod swap_request_repo;
pub mod user_repo;

pub use notification_repo::NotificationRepo;
pub use slot_repo::SlotRepo;
pub use swap_request_repo::SwapRequestRepo;
pub use user_repo::UserRepo;
