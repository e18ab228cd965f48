pub mod notification;
pub mod slot;
pub mod swap_request;
pub mod user;
