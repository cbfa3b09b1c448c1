//! Document store access.
//!
//! # Database: `yamweb`
//!
//! ## Collections
//!
//! - `foodItems` - Food items offered on the site
//! - `purchased-items` - One record per purchase
//!
//! Handlers never talk to the driver directly. They go through the
//! [`FoodRepository`] and [`PurchaseRepository`] traits, implemented by
//! [`MongoStore`] in production and [`MemoryStore`] in tests.
//!
//! Every repository method is a single store call. Nothing here spans two
//! calls in a transaction: recording a purchase and updating the item's stock
//! are separate requests, and two concurrent purchases of the same item can
//! overwrite each other's stock update.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use thiserror::Error;

use yamweb_core::{Email, FoodItemId, PurchaseId};

use crate::models::{
    DeleteSummary, FoodDetails, FoodItem, InsertSummary, NewFoodItem, OrderUpdate,
    PurchaseDetails, PurchaseRecord, UpdateSummary,
};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Collection holding food items.
pub const FOOD_COLLECTION: &str = "foodItems";

/// Collection holding purchase records.
pub const PURCHASE_COLLECTION: &str = "purchased-items";

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Error from the MongoDB driver.
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// A value could not be converted to a BSON document.
    #[error("serialization error: {0}")]
    Serialization(#[from] mongodb::bson::ser::Error),

    /// Data in the store is corrupted or the store is unusable.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Which food items a query selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FoodFilter {
    /// Every item.
    All,
    /// Items whose `foodCategory` equals the value exactly.
    Category(String),
    /// Items whose owner email equals the value exactly.
    Owner(String),
    /// Items whose `foodName` contains the value, ignoring case.
    NameContains(String),
}

/// Result ordering for a food query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FoodSort {
    /// Store order (insertion order for both implementations).
    #[default]
    Natural,
    /// Highest `orderedCount` first.
    OrderedCountDesc,
}

/// A fully specified food read: filter, order, window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodQuery {
    pub filter: FoodFilter,
    pub sort: FoodSort,
    pub skip: u64,
    /// Maximum number of results; `None` means unbounded.
    pub limit: Option<u64>,
}

impl FoodQuery {
    /// All items matching `filter`, in store order.
    #[must_use]
    pub const fn matching(filter: FoodFilter) -> Self {
        Self {
            filter,
            sort: FoodSort::Natural,
            skip: 0,
            limit: None,
        }
    }
}

/// Food item persistence.
#[async_trait]
pub trait FoodRepository: Send + Sync {
    /// Run a read query.
    async fn find_foods(&self, query: &FoodQuery) -> Result<Vec<FoodItem>, RepositoryError>;

    /// Look up a single item.
    async fn get_food(&self, id: FoodItemId) -> Result<Option<FoodItem>, RepositoryError>;

    /// Insert a new item under a store-assigned id.
    async fn insert_food(
        &self,
        item: &NewFoodItem,
    ) -> Result<InsertSummary<FoodItemId>, RepositoryError>;

    /// Overwrite the descriptive fields of an item, creating it if absent.
    ///
    /// `orderedCount` is left untouched (and absent on a freshly upserted item).
    async fn upsert_food(
        &self,
        id: FoodItemId,
        details: &FoodDetails,
    ) -> Result<UpdateSummary<FoodItemId>, RepositoryError>;

    /// Record new sales totals for an item.
    async fn record_order(
        &self,
        id: FoodItemId,
        update: OrderUpdate,
    ) -> Result<UpdateSummary<FoodItemId>, RepositoryError>;

    /// Delete an item.
    async fn delete_food(&self, id: FoodItemId) -> Result<DeleteSummary, RepositoryError>;

    /// Approximate number of items (may lag behind recent writes).
    async fn count_foods(&self) -> Result<u64, RepositoryError>;

    /// Check that the backing store answers.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Purchase record persistence.
#[async_trait]
pub trait PurchaseRepository: Send + Sync {
    /// All purchases made by `buyer`, in store order.
    async fn purchases_for_buyer(
        &self,
        buyer: &Email,
    ) -> Result<Vec<PurchaseRecord>, RepositoryError>;

    /// Record a purchase.
    async fn insert_purchase(
        &self,
        purchase: &PurchaseDetails,
    ) -> Result<InsertSummary<PurchaseId>, RepositoryError>;

    /// Delete (cancel) a purchase.
    async fn delete_purchase(&self, id: PurchaseId) -> Result<DeleteSummary, RepositoryError>;

    /// Approximate number of purchase records.
    async fn count_purchases(&self) -> Result<u64, RepositoryError>;
}
