//! Session issue, verification and logout over HTTP.

use chrono::{Duration, Utc};
use reqwest::{Client, StatusCode, header};
use serde_json::{Value, json};

use yamweb_integration_tests::{TEST_SECRET, TestServer, food, mint_token};

const OWNER: &str = "chef@yam.io";

fn owner_listing(server: &TestServer) -> String {
    server.url(&format!("/v1/api/foodItems?email={OWNER}"))
}

#[tokio::test]
async fn test_jwt_cookie_attributes() {
    let server = TestServer::spawn().await;
    let client = Client::new();

    let response = client
        .post(server.url("/v1/api/jwt"))
        .json(&json!({ "email": OWNER, "photoURL": "https://img.example/me.png" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .to_string();
    for attribute in ["HttpOnly", "Secure", "SameSite=None", "Path=/", "Max-Age=7200"] {
        assert!(set_cookie.contains(attribute), "missing {attribute}: {set_cookie}");
    }
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "success": true })
    );
}

#[tokio::test]
async fn test_protected_endpoints_reject_missing_session() {
    let server = TestServer::spawn().await;
    let client = Client::new();

    for url in [
        owner_listing(&server),
        server.url(&format!("/v1/api/purchasedItems?buyerEmail={OWNER}")),
    ] {
        let response = client.get(&url).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.json::<Value>().await.unwrap(),
            json!({ "message": "unauthorized access" })
        );
    }
}

#[tokio::test]
async fn test_expired_and_forged_tokens_rejected_like_missing() {
    let server = TestServer::spawn().await;
    let client = Client::new();

    let expired = mint_token(
        TEST_SECRET,
        OWNER,
        Utc::now() - Duration::hours(3),
        Duration::hours(2),
    );
    let forged = mint_token(
        "a-completely-different-signing-key!",
        OWNER,
        Utc::now(),
        Duration::hours(2),
    );

    for token in [expired, forged, "garbage".to_string()] {
        let response = client
            .get(owner_listing(&server))
            .header(header::COOKIE, format!("yamweb={token}"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.json::<Value>().await.unwrap()["message"],
            "unauthorized access"
        );
    }
}

#[tokio::test]
async fn test_valid_minted_token_accepted() {
    let server = TestServer::spawn().await;
    let client = Client::new();
    let token = mint_token(TEST_SECRET, OWNER, Utc::now(), Duration::hours(2));

    let response = client
        .get(owner_listing(&server))
        .header(header::COOKIE, format!("theme=dark; yamweb={token}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_mismatched_identity_forbidden() {
    let server = TestServer::spawn().await;
    let client = Client::new();
    let cookie = server.login(&client, "intruder@yam.io").await;

    let response = client
        .get(owner_listing(&server))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "message": "forbidden access" })
    );
}

#[tokio::test]
async fn test_browser_flow_with_cookie_jar() {
    let server = TestServer::spawn_insecure_cookies().await;
    let client = Client::builder().cookie_store(true).build().unwrap();

    server
        .create_food(&client, &food("Bibimbap", "Rice", OWNER, 0))
        .await;
    server
        .create_food(&client, &food("Tteokbokki", "Snacks", "other@yam.io", 0))
        .await;

    let response = client
        .post(server.url("/v1/api/jwt"))
        .json(&json!({ "email": OWNER }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mine: Value = client
        .get(owner_listing(&server))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["foodName"], "Bibimbap");

    let response = client
        .post(server.url("/v1/api/logout"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let removal = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(removal.contains("Max-Age=0"));

    let response = client.get(owner_listing(&server)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_email_rejected_at_issue() {
    let server = TestServer::spawn().await;
    let client = Client::new();

    let response = client
        .post(server.url("/v1/api/jwt"))
        .json(&json!({ "email": "not an email" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}
