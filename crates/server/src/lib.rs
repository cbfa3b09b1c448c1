//! yamweb server library.
//!
//! The HTTP backend of the yamweb food-ordering site as a library, so the
//! router can be driven from integration tests and the operator CLI can reuse
//! the configuration and repositories.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
