//! Food item route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use yamweb_core::FoodItemId;

use crate::error::Result;
use crate::extract::{AppJson, AppQuery};
use crate::middleware::OptionalSession;
use crate::models::{
    CountResponse, DeleteSummary, FoodDetails, FoodItem, InsertSummary, NewFoodItem, OrderUpdate,
    UpdateSummary,
};
use crate::services::listing::{ListMode, ListParams};
use crate::state::AppState;

/// List food items.
///
/// The query parameters select one read (see [`ListMode`]). Only the
/// per-owner listing needs a session, and only for the owner's own email.
#[instrument(skip(state, session))]
pub async fn list(
    State(state): State<AppState>,
    OptionalSession(session): OptionalSession,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<Vec<FoodItem>>> {
    let mode = ListMode::select(&params)?;
    mode.authorize(session.as_ref())?;

    let items = state.foods().find_foods(&mode.query()).await?;
    tracing::debug!(?mode, count = items.len(), "Listed food items");
    Ok(Json(items))
}

/// Look up one item. Responds with `null` when there is none.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<FoodItem>>> {
    let id = FoodItemId::parse(&id)?;
    Ok(Json(state.foods().get_food(id).await?))
}

/// Create an item.
#[instrument(skip(state, item))]
pub async fn create(
    State(state): State<AppState>,
    AppJson(item): AppJson<NewFoodItem>,
) -> Result<Json<InsertSummary<FoodItemId>>> {
    let summary = state.foods().insert_food(&item).await?;
    tracing::info!(id = %summary.inserted_id, "Food item created");
    Ok(Json(summary))
}

/// Overwrite an item's descriptive fields, creating it if the id is unknown.
#[instrument(skip(state, details))]
pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(details): AppJson<FoodDetails>,
) -> Result<Json<UpdateSummary<FoodItemId>>> {
    let id = FoodItemId::parse(&id)?;
    Ok(Json(state.foods().upsert_food(id, &details).await?))
}

/// Record an item's sales totals after a purchase.
///
/// The two values are taken as given; the client is expected to have read
/// the current item and done the arithmetic.
#[instrument(skip(state))]
pub async fn record_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(update): AppJson<OrderUpdate>,
) -> Result<Json<UpdateSummary<FoodItemId>>> {
    let id = FoodItemId::parse(&id)?;
    Ok(Json(state.foods().record_order(id, update).await?))
}

/// Delete an item.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteSummary>> {
    let id = FoodItemId::parse(&id)?;
    let summary = state.foods().delete_food(id).await?;
    if summary.deleted_count > 0 {
        tracing::info!(%id, "Food item deleted");
    }
    Ok(Json(summary))
}

/// Approximate number of items.
pub async fn count(State(state): State<AppState>) -> Result<Json<CountResponse>> {
    let count = state.foods().count_foods().await?;
    Ok(Json(CountResponse { count }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use super::super::test_support::{app, send, session_for, state};
    use crate::state::AppState;

    fn food(name: &str, category: &str, owner: &str, ordered: u32) -> Value {
        json!({
            "foodName": name,
            "foodImage": format!("https://img.example/{}.jpg", name.to_lowercase()),
            "foodCategory": category,
            "quantity": 20,
            "price": "7.50",
            "ownerName": "Chef",
            "ownerEmail": owner,
            "foodOrigin": "Japan",
            "description": "House special",
            "orderedCount": ordered
        })
    }

    async fn create(state: &AppState, body: Value) -> String {
        let (status, _, json) = send(app(state), "POST", "/v1/api/foodItems", None, Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        json["insertedId"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_create_then_show() {
        let state = state();
        let id = create(&state, food("Ramen", "Noodles", "chef@yam.io", 0)).await;

        let (status, _, item) =
            send(app(&state), "GET", &format!("/v1/api/foodItems/{id}"), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(item["_id"], id.as_str());
        assert_eq!(item["foodName"], "Ramen");
        assert_eq!(item["price"], "7.50");
        assert_eq!(item["ownerEmail"], "chef@yam.io");
    }

    #[tokio::test]
    async fn test_show_unknown_is_null() {
        let state = state();
        let (status, _, body) = send(
            app(&state),
            "GET",
            "/v1/api/foodItems/65a1f0c2e4b0a1b2c3d4e5f6",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let state = state();
        for method in ["GET", "DELETE"] {
            let (status, _, body) =
                send(app(&state), method, "/v1/api/foodItems/xyz", None, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body["message"].as_str().unwrap().contains("24"));
        }
    }

    #[tokio::test]
    async fn test_category_listing_is_exact() {
        let state = state();
        create(&state, food("Mochi", "Dessert", "a@yam.io", 0)).await;
        create(&state, food("Dorayaki", "dessert", "a@yam.io", 0)).await;
        create(&state, food("Udon", "Noodles", "a@yam.io", 0)).await;

        let (_, _, body) = send(
            app(&state),
            "GET",
            "/v1/api/foodItems?foodCategory=Dessert",
            None,
            None,
        )
        .await;
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["foodName"], "Mochi");
    }

    #[tokio::test]
    async fn test_owner_listing_requires_matching_session() {
        let state = state();
        create(&state, food("Gyoza", "Snacks", "chef@yam.io", 0)).await;
        let uri = "/v1/api/foodItems?email=chef@yam.io";

        let (status, _, body) = send(app(&state), "GET", uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "message": "unauthorized access" }));

        let other = session_for(&state, "guest@yam.io");
        let (status, _, body) = send(app(&state), "GET", uri, Some(&other), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "message": "forbidden access" }));

        let mine = session_for(&state, "chef@yam.io");
        let (status, _, body) = send(app(&state), "GET", uri, Some(&mine), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_top_and_default_limits() {
        let state = state();
        for i in 0..8 {
            create(&state, food(&format!("Dish{i}"), "Any", "a@yam.io", i)).await;
        }

        let (_, _, top) = send(app(&state), "GET", "/v1/api/foodItems?topItem=1", None, None).await;
        let counts: Vec<u64> = top
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["orderedCount"].as_u64().unwrap())
            .collect();
        assert_eq!(counts, [7, 6, 5, 4, 3, 2]);

        let (_, _, default) = send(app(&state), "GET", "/v1/api/foodItems", None, None).await;
        let default = default.as_array().unwrap();
        assert_eq!(default.len(), 6);
        assert_eq!(default[0]["foodName"], "Dish0");
    }

    #[tokio::test]
    async fn test_bad_page_is_bad_request() {
        let state = state();
        let (status, _, _) =
            send(app(&state), "GET", "/v1/api/foodItems?page=two", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_replace_keeps_ordered_count() {
        let state = state();
        let id = create(&state, food("Katsu", "Mains", "a@yam.io", 4)).await;
        let uri = format!("/v1/api/foodItems/{id}");

        let mut body = food("Katsu Curry", "Mains", "a@yam.io", 0);
        body.as_object_mut().unwrap().remove("orderedCount");
        let (status, _, summary) = send(app(&state), "PUT", &uri, None, Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["matchedCount"], 1);
        assert_eq!(summary["modifiedCount"], 1);
        assert_eq!(summary["upsertedId"], Value::Null);

        let (_, _, item) = send(app(&state), "GET", &uri, None, None).await;
        assert_eq!(item["foodName"], "Katsu Curry");
        assert_eq!(item["orderedCount"], 4);
    }

    #[tokio::test]
    async fn test_record_order_sets_totals() {
        let state = state();
        let id = create(&state, food("Onigiri", "Snacks", "a@yam.io", 2)).await;
        let uri = format!("/v1/api/foodItems/{id}");

        let (status, _, summary) = send(
            app(&state),
            "PATCH",
            &uri,
            None,
            Some(json!({ "totalOrderedCount": 5, "remainingQuantity": 17 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["modifiedCount"], 1);

        let (_, _, item) = send(app(&state), "GET", &uri, None, None).await;
        assert_eq!(item["orderedCount"], 5);
        assert_eq!(item["quantity"], 17);
    }

    #[tokio::test]
    async fn test_delete_then_show_and_count() {
        let state = state();
        let id = create(&state, food("Tempura", "Mains", "a@yam.io", 0)).await;
        create(&state, food("Soba", "Noodles", "a@yam.io", 0)).await;
        let uri = format!("/v1/api/foodItems/{id}");

        let (_, _, summary) = send(app(&state), "DELETE", &uri, None, None).await;
        assert_eq!(summary, json!({ "acknowledged": true, "deletedCount": 1 }));

        let (_, _, item) = send(app(&state), "GET", &uri, None, None).await;
        assert_eq!(item, Value::Null);

        let (_, _, count) = send(app(&state), "GET", "/v1/api/itemsCount", None, None).await;
        assert_eq!(count, json!({ "count": 1 }));
    }
}
