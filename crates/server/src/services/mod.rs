//! Request-independent logic used by the route handlers.
//!
//! # Services
//!
//! - `auth` - Session token signing and verification
//! - `listing` - Food listing mode selection and query translation

pub mod auth;
pub mod listing;
