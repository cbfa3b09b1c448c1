//! The buy flow: record a purchase, update stock, list and cancel.

use reqwest::{Client, StatusCode, header};
use serde_json::{Value, json};

use yamweb_integration_tests::{TestServer, food};

const BUYER: &str = "kai@yam.io";

fn purchase(food_id: &str, buyer: &str, quantity: u32) -> Value {
    json!({
        "foodId": food_id,
        "foodName": "Naengmyeon",
        "foodImage": "https://img.example/naengmyeon.jpg",
        "price": "11.00",
        "quantity": quantity,
        "buyerName": "Kai",
        "buyerEmail": buyer
    })
}

async fn post_purchase(server: &TestServer, client: &Client, body: &Value) -> Value {
    let response = client
        .post(server.url("/v1/api/purchasedItems"))
        .json(body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.unwrap()
}

#[tokio::test]
async fn test_buy_flow() {
    let server = TestServer::spawn().await;
    let client = Client::new();
    let food_id = server
        .create_food(&client, &food("Naengmyeon", "Noodles", "chef@yam.io", 0))
        .await;

    let summary = post_purchase(&server, &client, &purchase(&food_id, BUYER, 3)).await;
    assert_eq!(summary["acknowledged"], true);
    let purchase_id = summary["insertedId"].as_str().unwrap().to_string();

    let update: Value = client
        .patch(server.url(&format!("/v1/api/foodItems/{food_id}")))
        .json(&json!({ "totalOrderedCount": 3, "remainingQuantity": 22 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(update["matchedCount"], 1);
    assert_eq!(update["modifiedCount"], 1);

    let item: Value = client
        .get(server.url(&format!("/v1/api/foodItems/{food_id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(item["orderedCount"], 3);
    assert_eq!(item["quantity"], 22);

    let cookie = server.login(&client, BUYER).await;
    let mine: Value = client
        .get(server.url(&format!("/v1/api/purchasedItems?buyerEmail={BUYER}")))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["_id"], purchase_id.as_str());
    assert_eq!(mine[0]["foodId"], food_id.as_str());
    assert_eq!(mine[0]["quantity"], 3);
    assert!(mine[0]["purchasedAt"].is_string());

    let cancelled: Value = client
        .delete(server.url(&format!("/v1/api/purchasedItems/{purchase_id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cancelled, json!({ "acknowledged": true, "deletedCount": 1 }));

    let after: Value = client
        .get(server.url(&format!("/v1/api/purchasedItems?buyerEmail={BUYER}")))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(after, json!([]));
}

#[tokio::test]
async fn test_listing_only_returns_own_purchases() {
    let server = TestServer::spawn().await;
    let client = Client::new();
    let food_id = "65a1f0c2e4b0a1b2c3d4e5f6";

    for buyer in [BUYER, "mia@yam.io", BUYER, "lee@yam.io"] {
        post_purchase(&server, &client, &purchase(food_id, buyer, 1)).await;
    }

    let cookie = server.login(&client, "mia@yam.io").await;
    let response = client
        .get(server.url("/v1/api/purchasedItems?buyerEmail=mia@yam.io"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let list: Value = response.json().await.unwrap();
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["buyerEmail"], "mia@yam.io");

    let response = client
        .get(server.url(&format!("/v1/api/purchasedItems?buyerEmail={BUYER}")))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_explicit_purchase_time_kept() {
    let server = TestServer::spawn().await;
    let client = Client::new();

    let mut body = purchase("65a1f0c2e4b0a1b2c3d4e5f6", BUYER, 1);
    body["purchasedAt"] = json!("2024-03-01T12:30:00Z");
    post_purchase(&server, &client, &body).await;

    let cookie = server.login(&client, BUYER).await;
    let list: Value = client
        .get(server.url(&format!("/v1/api/purchasedItems?buyerEmail={BUYER}")))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let stamp = list[0]["purchasedAt"].as_str().unwrap();
    assert!(stamp.starts_with("2024-03-01T12:30:00"), "{stamp}");
}

#[tokio::test]
async fn test_cancel_malformed_id_is_bad_request() {
    let server = TestServer::spawn().await;
    let client = Client::new();

    let response = client
        .delete(server.url("/v1/api/purchasedItems/not-an-id"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
