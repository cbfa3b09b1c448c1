//! Purchase record route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use yamweb_core::PurchaseId;

use crate::error::Result;
use crate::extract::{AppJson, AppQuery};
use crate::middleware::RequireSession;
use crate::models::{DeleteSummary, InsertSummary, PurchaseDetails, PurchaseRecord};
use crate::services::auth::AuthError;
use crate::state::AppState;

/// Query parameters of `GET /v1/api/purchasedItems`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseQuery {
    pub buyer_email: Option<String>,
}

/// List the caller's own purchases.
///
/// `buyerEmail` must name the session's own email. Asking for someone
/// else's purchases, or leaving it out, is forbidden.
#[instrument(skip(state, identity), fields(buyer = %identity.email))]
pub async fn list(
    State(state): State<AppState>,
    RequireSession(identity): RequireSession,
    AppQuery(query): AppQuery<PurchaseQuery>,
) -> Result<Json<Vec<PurchaseRecord>>> {
    let requested = query.buyer_email.unwrap_or_default();
    if !identity.email.matches(&requested) {
        tracing::debug!(requested = %requested, "Purchase listing for another buyer refused");
        return Err(AuthError::Forbidden.into());
    }

    Ok(Json(state.purchases().purchases_for_buyer(&identity.email).await?))
}

/// Record a purchase. The timestamp defaults to now.
///
/// Stock on the food item is not touched here; the client follows up with
/// a `PATCH` on the item. The two writes are not atomic, so concurrent
/// buyers of the same item can lose an update.
#[instrument(skip(state, details), fields(food_id = %details.food_id))]
pub async fn create(
    State(state): State<AppState>,
    AppJson(mut details): AppJson<PurchaseDetails>,
) -> Result<Json<InsertSummary<PurchaseId>>> {
    details.purchased_at.get_or_insert_with(Utc::now);

    let summary = state.purchases().insert_purchase(&details).await?;
    tracing::info!(id = %summary.inserted_id, "Purchase recorded");
    Ok(Json(summary))
}

/// Delete (cancel) a purchase.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteSummary>> {
    let id = PurchaseId::parse(&id)?;
    Ok(Json(state.purchases().delete_purchase(id).await?))
}
