//! In-memory repositories.
//!
//! Backs the integration tests and `YAMWEB_STORE=memory` local runs. Data
//! lives for the life of the process.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use yamweb_core::{Email, FoodItemId, PurchaseId};

use super::{FoodFilter, FoodQuery, FoodRepository, FoodSort, PurchaseRepository, RepositoryError};
use crate::models::{
    DeleteSummary, FoodDetails, FoodItem, InsertSummary, NewFoodItem, OrderUpdate,
    PurchaseDetails, PurchaseRecord, UpdateSummary,
};

/// Vec-backed store. Insertion order is the natural order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    foods: RwLock<Vec<FoodItem>>,
    purchases: RwLock<Vec<PurchaseRecord>>,
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, RepositoryError> {
    lock.read()
        .map_err(|_| RepositoryError::DataCorruption("lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, RepositoryError> {
    lock.write()
        .map_err(|_| RepositoryError::DataCorruption("lock poisoned".to_string()))
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FoodFilter {
    fn accepts(&self, item: &FoodItem) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => item.details.food_category == *category,
            Self::Owner(email) => item.details.owner_email == *email,
            Self::NameContains(term) => item
                .details
                .food_name
                .to_lowercase()
                .contains(&term.to_lowercase()),
        }
    }
}

#[async_trait]
impl FoodRepository for MemoryStore {
    async fn find_foods(&self, query: &FoodQuery) -> Result<Vec<FoodItem>, RepositoryError> {
        let foods = read(&self.foods)?;
        let mut matched: Vec<FoodItem> = foods
            .iter()
            .filter(|item| query.filter.accepts(item))
            .cloned()
            .collect();

        if query.sort == FoodSort::OrderedCountDesc {
            // stable: ties keep store order
            matched.sort_by(|a, b| b.ordered_count.cmp(&a.ordered_count));
        }

        let limit = query.limit.map_or(usize::MAX, to_usize);
        Ok(matched
            .into_iter()
            .skip(to_usize(query.skip))
            .take(limit)
            .collect())
    }

    async fn get_food(&self, id: FoodItemId) -> Result<Option<FoodItem>, RepositoryError> {
        let foods = read(&self.foods)?;
        Ok(foods.iter().find(|item| item.id == id).cloned())
    }

    async fn insert_food(
        &self,
        item: &NewFoodItem,
    ) -> Result<InsertSummary<FoodItemId>, RepositoryError> {
        let id = FoodItemId::from_bytes(ObjectId::new().bytes());
        write(&self.foods)?.push(item.clone().with_id(id));
        Ok(InsertSummary::new(id))
    }

    async fn upsert_food(
        &self,
        id: FoodItemId,
        details: &FoodDetails,
    ) -> Result<UpdateSummary<FoodItemId>, RepositoryError> {
        let mut foods = write(&self.foods)?;
        if let Some(item) = foods.iter_mut().find(|item| item.id == id) {
            let modified = u64::from(item.details != *details);
            item.details = details.clone();
            return Ok(UpdateSummary::new(1, modified, None));
        }

        foods.push(FoodItem {
            id,
            details: details.clone(),
            ordered_count: 0,
        });
        Ok(UpdateSummary::new(0, 0, Some(id)))
    }

    async fn record_order(
        &self,
        id: FoodItemId,
        update: OrderUpdate,
    ) -> Result<UpdateSummary<FoodItemId>, RepositoryError> {
        let mut foods = write(&self.foods)?;
        let Some(item) = foods.iter_mut().find(|item| item.id == id) else {
            return Ok(UpdateSummary::new(0, 0, None));
        };

        let modified = item.ordered_count != update.total_ordered_count
            || item.details.quantity != update.remaining_quantity;
        item.ordered_count = update.total_ordered_count;
        item.details.quantity = update.remaining_quantity;
        Ok(UpdateSummary::new(1, u64::from(modified), None))
    }

    async fn delete_food(&self, id: FoodItemId) -> Result<DeleteSummary, RepositoryError> {
        let mut foods = write(&self.foods)?;
        let before = foods.len();
        foods.retain(|item| item.id != id);
        Ok(DeleteSummary::new((before - foods.len()) as u64))
    }

    async fn count_foods(&self) -> Result<u64, RepositoryError> {
        Ok(read(&self.foods)?.len() as u64)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        read(&self.foods).map(|_| ())
    }
}

#[async_trait]
impl PurchaseRepository for MemoryStore {
    async fn purchases_for_buyer(
        &self,
        buyer: &Email,
    ) -> Result<Vec<PurchaseRecord>, RepositoryError> {
        let purchases = read(&self.purchases)?;
        Ok(purchases
            .iter()
            .filter(|p| p.details.buyer_email == *buyer)
            .cloned()
            .collect())
    }

    async fn insert_purchase(
        &self,
        purchase: &PurchaseDetails,
    ) -> Result<InsertSummary<PurchaseId>, RepositoryError> {
        let id = PurchaseId::from_bytes(ObjectId::new().bytes());
        write(&self.purchases)?.push(PurchaseRecord {
            id,
            details: purchase.clone(),
        });
        Ok(InsertSummary::new(id))
    }

    async fn delete_purchase(&self, id: PurchaseId) -> Result<DeleteSummary, RepositoryError> {
        let mut purchases = write(&self.purchases)?;
        let before = purchases.len();
        purchases.retain(|p| p.id != id);
        Ok(DeleteSummary::new((before - purchases.len()) as u64))
    }

    async fn count_purchases(&self) -> Result<u64, RepositoryError> {
        Ok(read(&self.purchases)?.len() as u64)
    }
}
