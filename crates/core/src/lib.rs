//! Yamweb Core - shared domain types.
//!
//! This crate provides the types used across the yamweb components:
//! - `server` - HTTP backend for the food-ordering site
//! - `cli` - Seeding and inspection tools
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. Anything that crosses a trust boundary (path segments, JSON
//! bodies, token claims) is parsed into one of these types first.
//!
//! # Modules
//!
//! - [`types`] - Validated email addresses and document identifiers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
