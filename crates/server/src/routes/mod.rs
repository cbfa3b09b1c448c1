//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                          - Liveness banner
//! GET    /health                    - Liveness check
//! GET    /health/ready              - Readiness check (pings the store)
//!
//! # Session
//! POST   /v1/api/jwt                - Issue session cookie
//! POST   /v1/api/logout             - Clear session cookie
//!
//! # Food items
//! GET    /v1/api/foodItems          - Listing (mode chosen by query parameters)
//! POST   /v1/api/foodItems          - Create
//! GET    /v1/api/foodItems/{id}     - Lookup (item or null)
//! PUT    /v1/api/foodItems/{id}     - Replace descriptive fields (upsert)
//! PATCH  /v1/api/foodItems/{id}     - Record sales totals
//! DELETE /v1/api/foodItems/{id}     - Delete
//! GET    /v1/api/itemsCount         - Approximate item count
//!
//! # Purchases
//! GET    /v1/api/purchasedItems     - Own purchases (requires session)
//! POST   /v1/api/purchasedItems     - Record a purchase
//! DELETE /v1/api/purchasedItems/{id} - Cancel a purchase
//! ```

pub mod auth;
pub mod foods;
pub mod health;
pub mod purchases;

use axum::{
    Router,
    http::{Request, Response},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the `/v1/api` routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/jwt", post(auth::issue))
        .route("/logout", post(auth::logout))
        .route("/foodItems", get(foods::list).post(foods::create))
        .route(
            "/foodItems/{id}",
            get(foods::show)
                .put(foods::replace)
                .patch(foods::record_order)
                .delete(foods::delete),
        )
        .route("/itemsCount", get(foods::count))
        .route(
            "/purchasedItems",
            get(purchases::list).post(purchases::create),
        )
        .route(
            "/purchasedItems/{id}",
            axum::routing::delete(purchases::delete),
        )
}

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/v1/api", api_routes())
}

/// Build the complete application: routes, state, request tracing and ids.
///
/// Sentry layers are added by the binary, outside of this.
pub fn build_router(state: AppState) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
                status = tracing::field::Empty,
                latency_ms = tracing::field::Empty,
            )
        })
        .on_response(
            |response: &Response<_>, latency: std::time::Duration, span: &Span| {
                span.record("status", response.status().as_u16());
                span.record(
                    "latency_ms",
                    u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                );
                DefaultOnResponse::default().on_response(response, latency, span);
            },
        );

    routes().with_state(state).layer(
        ServiceBuilder::new()
            .layer(trace)
            .layer(middleware::from_fn(request_id_middleware)),
    )
}
