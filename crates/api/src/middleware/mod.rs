//! Request extractors shared by handlers.
//!
//! - [`auth::AuthUser`] -- the authenticated subject from a JWT Bearer token.

pub mod auth;
