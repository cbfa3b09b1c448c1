//! Integration tests for the yamweb server.
//!
//! Each test spawns the real router on an ephemeral port, backed by the
//! in-memory store, and talks to it over HTTP with `reqwest`. No database or
//! external service is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p yamweb-integration-tests
//! ```

#![allow(clippy::missing_panics_doc)]

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use secrecy::SecretString;
use serde_json::{Value, json};

use yamweb_server::config::{ServerConfig, SessionConfig, StoreConfig};
use yamweb_server::services::auth::SessionClaims;
use yamweb_server::{AppState, build_router};

/// Signing secret shared by every test server.
pub const TEST_SECRET: &str = "Zr4!qW8@eT1#yU5$iO9%pA2^sD6&fG0*";

/// A server running on `127.0.0.1:<random port>` for the life of the value.
pub struct TestServer {
    pub base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Spawn a server whose cookies are marked `Secure` (production attributes).
    pub async fn spawn() -> Self {
        Self::spawn_with(config(true)).await
    }

    /// Spawn a server that sets plain-http cookies, so a cookie-jar client
    /// can carry the session across requests.
    pub async fn spawn_insecure_cookies() -> Self {
        Self::spawn_with(config(false)).await
    }

    async fn spawn_with(config: ServerConfig) -> Self {
        let app = build_router(AppState::in_memory(config));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().expect("no local address");
        let base_url = format!("http://{addr}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server error");
        });

        Self { base_url, handle }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sign in as `email` and return the `Cookie` header value to send back.
    pub async fn login(&self, client: &Client, email: &str) -> String {
        let response = client
            .post(self.url("/v1/api/jwt"))
            .json(&json!({ "email": email }))
            .send()
            .await
            .expect("jwt request failed");
        assert!(response.status().is_success(), "login failed");

        let set_cookie = response
            .headers()
            .get(reqwest::header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .expect("no set-cookie header");
        cookie_pair(set_cookie)
    }

    /// Create a food item and return its id.
    pub async fn create_food(&self, client: &Client, item: &Value) -> String {
        let body: Value = client
            .post(self.url("/v1/api/foodItems"))
            .json(item)
            .send()
            .await
            .expect("create request failed")
            .json()
            .await
            .expect("create response not json");
        body["insertedId"]
            .as_str()
            .expect("no insertedId")
            .to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn config(cookie_secure: bool) -> ServerConfig {
    ServerConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        store: StoreConfig::Memory,
        session: SessionConfig {
            secret: SecretString::from(TEST_SECRET.to_string()),
            cookie_secure,
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// The `name=value` part of a `Set-Cookie` header.
#[must_use]
pub fn cookie_pair(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Sign session claims directly, bypassing the server.
#[must_use]
pub fn mint_token(secret: &str, email: &str, issued_at: DateTime<Utc>, ttl: Duration) -> String {
    let claims = SessionClaims {
        email: email.to_string(),
        iat: issued_at.timestamp(),
        exp: (issued_at + ttl).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

/// A complete food item request body.
#[must_use]
pub fn food(name: &str, category: &str, owner: &str, ordered_count: u32) -> Value {
    json!({
        "foodName": name,
        "foodImage": format!("https://img.example/{}.jpg", name.to_lowercase().replace(' ', "-")),
        "foodCategory": category,
        "quantity": 25,
        "price": "9.90",
        "ownerName": "Chef",
        "ownerEmail": owner,
        "foodOrigin": "Korea",
        "description": "Made to order",
        "orderedCount": ordered_count
    })
}
