//! HTTP middleware and extractors.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction) - `main.rs` only
//! 2. `TraceLayer` (request span)
//! 3. Request ID (records into the span, echoes `x-request-id`)
//!
//! Session checks are extractors, not layers: only the handlers that need a
//! session pay for verifying one.

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{OptionalSession, RequireSession};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::{SESSION_COOKIE_NAME, removal_cookie, session_cookie, session_token};
