pub mod auth;
pub mod notification;
pub mod slots;
pub mod swaps;
