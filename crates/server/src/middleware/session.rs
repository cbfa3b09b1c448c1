//! Session cookie handling.
//!
//! The signed session token travels in a single cookie. Issuing sets it,
//! logout overwrites it with an expired copy; the server keeps no session
//! state of its own.

use axum::http::{HeaderMap, header::COOKIE};
use cookie::{Cookie, SameSite, time::Duration};

use crate::services::auth::SESSION_TTL_SECONDS;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "yamweb";

fn base_cookie(value: String, secure: bool) -> Cookie<'static> {
    // Cross-site SameSite=None is only honoured on secure cookies.
    let same_site = if secure { SameSite::None } else { SameSite::Lax };

    Cookie::build((SESSION_COOKIE_NAME, value))
        .http_only(true)
        .secure(secure)
        .same_site(same_site)
        .path("/")
        .build()
}

/// The cookie carrying a freshly issued session token.
#[must_use]
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    let mut cookie = base_cookie(token, secure);
    cookie.set_max_age(Duration::seconds(SESSION_TTL_SECONDS));
    cookie
}

/// A cookie that makes the browser drop the session cookie.
#[must_use]
pub fn removal_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = base_cookie(String::new(), secure);
    cookie.make_removal();
    cookie
}

/// The session token from the request's `Cookie` headers, if any.
///
/// Unparseable cookie pairs are skipped. An empty value counts as absent.
#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_owned())
        .filter(|value| !value.is_empty())
}
