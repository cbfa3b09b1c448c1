//! Session tokens.
//!
//! A session is a stateless HS256 JWT carrying the user's email. Nothing is
//! stored server-side: a token is valid if its signature checks out and it
//! has not expired, and it cannot be revoked before then.

mod error;

pub use error::AuthError;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use yamweb_core::Email;

/// Lifetime of a session token (and of the cookie carrying it).
pub const SESSION_TTL_SECONDS: i64 = 2 * 60 * 60;

/// Claims encoded in a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub email: String,
    /// Issued at (Unix seconds).
    pub iat: i64,
    /// Expires at (Unix seconds).
    pub exp: i64,
}

/// The identity attached to an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub email: Email,
    pub expires_at: i64,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

/// Signs and verifies session tokens with the shared HS256 secret.
///
/// Cheap to clone.
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<Keys>,
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys").finish_non_exhaustive()
    }
}

impl SessionKeys {
    /// Build keys from the signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            inner: Arc::new(Keys {
                encoding: EncodingKey::from_secret(bytes),
                decoding: DecodingKey::from_secret(bytes),
                validation,
            }),
        }
    }

    /// Sign a token for `email`, valid for [`SESSION_TTL_SECONDS`] from now.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenIssue` if signing fails.
    pub fn issue(&self, email: &Email) -> Result<String, AuthError> {
        self.issue_at(email, Utc::now())
    }

    /// Sign a token as if issued at `now`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenIssue` if signing fails.
    pub fn issue_at(&self, email: &Email, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = SessionClaims {
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(SESSION_TTL_SECONDS)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.inner.encoding)
            .map_err(AuthError::TokenIssue)
    }

    /// Verify a token and extract the identity it carries.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredential` on a bad signature, a malformed
    /// or expired token, and `AuthError::InvalidIdentity` if the email claim
    /// does not parse.
    pub fn verify(&self, token: &str) -> Result<SessionIdentity, AuthError> {
        let data = decode::<SessionClaims>(token, &self.inner.decoding, &self.inner.validation)
            .map_err(AuthError::InvalidCredential)?;

        let email = Email::parse(&data.claims.email).map_err(AuthError::InvalidIdentity)?;
        Ok(SessionIdentity {
            email,
            expires_at: data.claims.exp,
        })
    }
}
