//! Request extractors whose rejections are [`AppError`]s.
//!
//! axum's own `Json` and `Query` reject with plain-text bodies. These
//! wrappers run the same extraction and turn a rejection into a 400 with the
//! usual `{"message"}` body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Deserialized query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
