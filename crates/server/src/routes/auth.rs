//! Session route handlers.
//!
//! Issuing a session signs the submitted email and hands the token back as an
//! HTTP-only cookie. There is no password step: whoever can reach this
//! endpoint can claim any well-formed email. Logout only asks the browser to
//! forget the cookie; the token itself stays valid until it expires.

use axum::{
    Json,
    extract::State,
    http::header::SET_COOKIE,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use yamweb_core::Email;

use crate::error::Result;
use crate::extract::AppJson;
use crate::middleware::{removal_cookie, session_cookie};
use crate::state::AppState;

/// Body of `POST /v1/api/jwt`. Other fields the client sends are ignored.
#[derive(Debug, Deserialize)]
pub struct IssueRequest {
    #[serde(default)]
    pub email: String,
}

/// Sign a session token and set it as the session cookie.
#[instrument(skip(state, body))]
pub async fn issue(
    State(state): State<AppState>,
    AppJson(body): AppJson<IssueRequest>,
) -> Result<impl IntoResponse> {
    let email = Email::parse(&body.email)?;
    let token = state.sessions().issue(&email)?;
    let cookie = session_cookie(token, state.cookie_secure());

    tracing::info!(email = %email, "Session issued");
    Ok((
        [(SET_COOKIE, cookie.to_string())],
        Json(json!({ "success": true })),
    ))
}

/// Clear the session cookie.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = removal_cookie(state.cookie_secure());
    (
        [(SET_COOKIE, cookie.to_string())],
        Json(json!({ "success": true })),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::super::test_support::{app, send, state};

    #[tokio::test]
    async fn test_issue_sets_cookie() {
        let state = state();
        let (status, headers, body) = send(
            app(&state),
            "POST",
            "/v1/api/jwt",
            None,
            Some(json!({ "email": "diner@yam.io", "displayName": "Dee" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));
        let cookie = headers["set-cookie"].to_str().unwrap();
        assert!(cookie.starts_with("yamweb="));
        assert!(cookie.contains("Max-Age=7200"));
    }

    #[tokio::test]
    async fn test_issue_rejects_bad_email() {
        let state = state();
        for body in [json!({ "email": "nope" }), json!({})] {
            let (status, headers, _) =
                send(app(&state), "POST", "/v1/api/jwt", None, Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(headers.get("set-cookie").is_none());
        }
    }

    #[tokio::test]
    async fn test_logout_expires_cookie() {
        let state = state();
        let (status, headers, body) = send(app(&state), "POST", "/v1/api/logout", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let cookie = headers["set-cookie"].to_str().unwrap();
        assert!(cookie.starts_with("yamweb=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
