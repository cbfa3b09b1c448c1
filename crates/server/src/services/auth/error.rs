//! Authentication error types.

use thiserror::Error;

use yamweb_core::EmailError;

/// Errors that can occur while issuing or checking a session.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No session cookie on the request.
    #[error("missing session credential")]
    MissingCredential,

    /// Token failed verification (bad signature, malformed, or expired).
    #[error("invalid session credential: {0}")]
    InvalidCredential(#[source] jsonwebtoken::errors::Error),

    /// Token verified but its identity claim is not a usable email.
    #[error("invalid identity claim: {0}")]
    InvalidIdentity(#[source] EmailError),

    /// Authenticated, but not as the user the request is about.
    #[error("identity does not match the requested resource")]
    Forbidden,

    /// The email submitted to be signed is not valid.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Signing failed.
    #[error("failed to issue session token: {0}")]
    TokenIssue(#[source] jsonwebtoken::errors::Error),
}

impl AuthError {
    /// True for the failures that surface as "unauthorized access".
    #[must_use]
    pub const fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential | Self::InvalidCredential(_) | Self::InvalidIdentity(_)
        )
    }
}
