//! Collection statistics.

use tracing::info;

use yamweb_server::db::{FOOD_COLLECTION, FoodRepository, PURCHASE_COLLECTION, PurchaseRepository};

/// Print the estimated size of each collection.
///
/// # Errors
///
/// Returns an error if the database connection or a count fails.
pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let store = super::connect().await?;

    let foods = store.count_foods().await?;
    let purchases = store.count_purchases().await?;

    info!("Collection Statistics (estimated)");
    info!("=================================");
    info!("{FOOD_COLLECTION}: {foods}");
    info!("{PURCHASE_COLLECTION}: {purchases}");

    store.client().clone().shutdown().await;
    Ok(())
}
