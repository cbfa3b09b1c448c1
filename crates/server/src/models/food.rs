//! Food item types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use yamweb_core::FoodItemId;

/// The descriptive fields of a food item.
///
/// This is the body of a full update (`PUT`), and the part of a create
/// request every item must carry. Older records were written with `name` and
/// `email` for the owner fields; both spellings are accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodDetails {
    pub food_name: String,
    pub food_image: String,
    pub food_category: String,
    /// Units still available.
    pub quantity: u32,
    pub price: Decimal,
    #[serde(alias = "name")]
    pub owner_name: String,
    #[serde(alias = "email")]
    pub owner_email: String,
    pub food_origin: String,
    pub description: String,
}

/// A stored food item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    #[serde(rename = "_id")]
    pub id: FoodItemId,
    #[serde(flatten)]
    pub details: FoodDetails,
    /// Total units sold so far.
    #[serde(default, alias = "OrderedCount")]
    pub ordered_count: u32,
}

/// Request body for creating a food item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFoodItem {
    #[serde(flatten)]
    pub details: FoodDetails,
    #[serde(default, alias = "OrderedCount")]
    pub ordered_count: u32,
}

impl NewFoodItem {
    /// Attach a store-assigned id.
    #[must_use]
    pub fn with_id(self, id: FoodItemId) -> FoodItem {
        FoodItem {
            id,
            details: self.details,
            ordered_count: self.ordered_count,
        }
    }
}

/// Request body for the post-purchase stock update (`PATCH`).
///
/// The client computes both totals; the store just records them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub total_ordered_count: u32,
    pub remaining_quantity: u32,
}
