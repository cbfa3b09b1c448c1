//! Session extractors.
//!
//! Handlers opt into authentication by taking one of these as an argument.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use super::session::session_token;
use crate::error::AppError;
use crate::services::auth::{AuthError, SessionIdentity, SessionKeys};

fn verify(parts: &Parts, keys: &SessionKeys) -> Result<SessionIdentity, AuthError> {
    let token = session_token(&parts.headers).ok_or(AuthError::MissingCredential)?;
    keys.verify(&token).inspect_err(|err| {
        tracing::debug!(error = %err, "session token rejected");
    })
}

/// Extractor that requires a valid session.
///
/// Rejects with 401 before the handler runs when the cookie is missing or
/// the token does not verify.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireSession(identity): RequireSession,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", identity.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireSession(pub SessionIdentity);

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = SessionKeys::from_ref(state);
        Ok(Self(verify(parts, &keys)?))
    }
}

/// Extractor that yields the session if there is a valid one.
///
/// Unlike `RequireSession`, this never rejects: a missing or invalid token
/// both come through as `None`.
#[derive(Debug, Clone)]
pub struct OptionalSession(pub Option<SessionIdentity>);

impl<S> FromRequestParts<S> for OptionalSession
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = SessionKeys::from_ref(state);
        Ok(Self(verify(parts, &keys).ok()))
    }
}
