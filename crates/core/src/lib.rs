//! Domain types and rules for calendar slot exchange.
//!
//! Everything here is storage-agnostic: status enums, transition rules,
//! swap preconditions, and input validation shared by the database, exchange,
//! and API crates.

pub mod error;
pub mod notification;
pub mod slot;
pub mod swap;
pub mod types;
pub mod validation;
