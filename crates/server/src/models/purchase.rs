//! Purchase record types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use yamweb_core::{Email, FoodItemId, PurchaseId};

/// What was bought, by whom. This is the create request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDetails {
    /// The purchased food item.
    pub food_id: FoodItemId,
    pub food_name: String,
    #[serde(default)]
    pub food_image: String,
    /// Unit price at the time of purchase.
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub buyer_name: String,
    pub buyer_email: Email,
    #[serde(default)]
    pub purchased_at: Option<DateTime<Utc>>,
}

/// A stored purchase record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    #[serde(rename = "_id")]
    pub id: PurchaseId,
    #[serde(flatten)]
    pub details: PurchaseDetails,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_buyer_email_validated() {
        let body = json!({
            "foodId": "65a1f0c2e4b0a1b2c3d4e5f6",
            "foodName": "Pho",
            "price": "9.00",
            "quantity": 2,
            "buyerEmail": "not-an-email"
        });
        assert!(serde_json::from_value::<PurchaseDetails>(body).is_err());
    }

    #[test]
    fn test_optional_fields_default() {
        let body = json!({
            "foodId": "65a1f0c2e4b0a1b2c3d4e5f6",
            "foodName": "Pho",
            "price": "9.00",
            "quantity": 2,
            "buyerEmail": "a@b.com"
        });
        let details: PurchaseDetails = serde_json::from_value(body).unwrap();
        assert!(details.buyer_name.is_empty());
        assert!(details.purchased_at.is_none());
        assert_eq!(details.food_id.to_string(), "65a1f0c2e4b0a1b2c3d4e5f6");
    }
}
