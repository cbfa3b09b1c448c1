//! Liveness and readiness endpoints.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Banner at `/`, kept for uptime monitors that already poll it.
pub async fn root() -> &'static str {
    "Yam web server is running"
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn live() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store does not answer a ping.
pub async fn ready(State(state): State<AppState>) -> StatusCode {
    match state.foods().ping().await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            tracing::warn!(error = %err, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::super::test_support::{app, send, state};

    #[tokio::test]
    async fn test_health_endpoints() {
        let state = state();
        for uri in ["/", "/health", "/health/ready"] {
            let (status, headers, _) = send(app(&state), "GET", uri, None, None).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert!(headers.contains_key("x-request-id"));
        }
    }
}
