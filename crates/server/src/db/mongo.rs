//! MongoDB-backed repositories.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Document, doc, oid::ObjectId};
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection};
use regex::escape;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use yamweb_core::{Email, FoodItemId, PurchaseId};

use super::{
    FOOD_COLLECTION, FoodFilter, FoodQuery, FoodRepository, FoodSort, PURCHASE_COLLECTION,
    PurchaseRepository, RepositoryError,
};
use crate::config::MongoConfig;
use crate::models::{
    DeleteSummary, FoodDetails, FoodItem, InsertSummary, NewFoodItem, OrderUpdate,
    PurchaseDetails, PurchaseRecord, UpdateSummary,
};

/// Food item as stored: same fields as [`FoodItem`], native `ObjectId` key.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoodDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(flatten)]
    details: FoodDetails,
    #[serde(default, alias = "OrderedCount")]
    ordered_count: u32,
}

impl From<FoodDocument> for FoodItem {
    fn from(doc: FoodDocument) -> Self {
        Self {
            id: FoodItemId::from_bytes(doc.id.bytes()),
            details: doc.details,
            ordered_count: doc.ordered_count,
        }
    }
}

/// Purchase record as stored.
#[derive(Debug, Serialize, Deserialize)]
struct PurchaseDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(flatten)]
    details: PurchaseDetails,
}

impl From<PurchaseDocument> for PurchaseRecord {
    fn from(doc: PurchaseDocument) -> Self {
        Self {
            id: PurchaseId::from_bytes(doc.id.bytes()),
            details: doc.details,
        }
    }
}

/// Repositories over a MongoDB database.
///
/// Cheap to clone; all clones share the driver's connection pool.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    foods: Collection<FoodDocument>,
    purchases: Collection<PurchaseDocument>,
}

impl MongoStore {
    /// Build a client for the configured database.
    ///
    /// Uses the Stable API (v1, strict). The driver connects lazily, so this
    /// only fails on a malformed connection string or unresolvable SRV record;
    /// call [`FoodRepository::ping`] to verify the server is reachable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the options cannot be parsed.
    pub async fn connect(config: &MongoConfig) -> Result<Self, RepositoryError> {
        let mut options = ClientOptions::parse(config.uri.expose_secret()).await?;
        options.app_name = Some("yamweb-server".to_owned());
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );

        let client = Client::with_options(options)?;
        let database = client.database(&config.database);

        Ok(Self {
            foods: database.collection(FOOD_COLLECTION),
            purchases: database.collection(PURCHASE_COLLECTION),
            client,
        })
    }

    /// The underlying driver client (for shutdown).
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// Delete every food item. Returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn clear_foods(&self) -> Result<u64, RepositoryError> {
        let result = self.foods.delete_many(doc! {}).await?;
        Ok(result.deleted_count)
    }
}

fn food_filter(filter: &FoodFilter) -> Document {
    match filter {
        FoodFilter::All => doc! {},
        FoodFilter::Category(category) => doc! { "foodCategory": category.as_str() },
        // Older items carry the owner under `email`.
        FoodFilter::Owner(email) => doc! {
            "$or": [
                { "ownerEmail": email.as_str() },
                { "email": email.as_str() },
            ]
        },
        // Search terms are matched literally, never as a pattern.
        FoodFilter::NameContains(term) => doc! {
            "foodName": { "$regex": escape(term), "$options": "i" }
        },
    }
}

/// Stages that rewrite legacy field names to the current ones.
///
/// Older items store `name`, `email` and `OrderedCount`; some have both the
/// old and the new key. After these stages every item has only the current
/// keys, so sorting sees one count and decoding never meets a duplicate.
fn normalize_legacy_fields() -> [Document; 2] {
    [
        doc! {
            "$set": {
                "ownerName": { "$ifNull": ["$ownerName", "$name"] },
                "ownerEmail": { "$ifNull": ["$ownerEmail", "$email"] },
                "orderedCount": {
                    "$ifNull": ["$orderedCount", { "$ifNull": ["$OrderedCount", 0] }]
                },
            }
        },
        doc! { "$unset": ["name", "email", "OrderedCount"] },
    ]
}

/// Aggregation pipeline for a food read: match, normalize, order, window.
fn find_pipeline(query: &FoodQuery) -> Vec<Document> {
    let mut pipeline = vec![doc! { "$match": food_filter(&query.filter) }];
    pipeline.extend(normalize_legacy_fields());

    if query.sort == FoodSort::OrderedCountDesc {
        pipeline.push(doc! { "$sort": { "orderedCount": -1, "_id": 1 } });
    }
    if query.skip > 0 {
        pipeline.push(doc! { "$skip": i64::try_from(query.skip).unwrap_or(i64::MAX) });
    }
    if let Some(limit) = query.limit {
        pipeline.push(doc! { "$limit": i64::try_from(limit).unwrap_or(i64::MAX) });
    }

    pipeline
}

fn by_id(id: [u8; 12]) -> Document {
    doc! { "_id": ObjectId::from_bytes(id) }
}

fn update_summary(result: &mongodb::results::UpdateResult) -> UpdateSummary<FoodItemId> {
    let upserted_id = result
        .upserted_id
        .as_ref()
        .and_then(mongodb::bson::Bson::as_object_id)
        .map(|oid| FoodItemId::from_bytes(oid.bytes()));
    UpdateSummary::new(result.matched_count, result.modified_count, upserted_id)
}

#[async_trait]
impl FoodRepository for MongoStore {
    #[instrument(skip(self))]
    async fn find_foods(&self, query: &FoodQuery) -> Result<Vec<FoodItem>, RepositoryError> {
        let docs: Vec<FoodDocument> = self
            .foods
            .aggregate(find_pipeline(query))
            .with_type::<FoodDocument>()
            .await?
            .try_collect()
            .await?;
        Ok(docs.into_iter().map(FoodItem::from).collect())
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_food(&self, id: FoodItemId) -> Result<Option<FoodItem>, RepositoryError> {
        let mut pipeline = vec![doc! { "$match": by_id(id.bytes()) }];
        pipeline.extend(normalize_legacy_fields());

        let mut cursor = self
            .foods
            .aggregate(pipeline)
            .with_type::<FoodDocument>()
            .await?;
        Ok(cursor.try_next().await?.map(FoodItem::from))
    }

    #[instrument(skip(self, item), fields(food_name = %item.details.food_name))]
    async fn insert_food(
        &self,
        item: &NewFoodItem,
    ) -> Result<InsertSummary<FoodItemId>, RepositoryError> {
        let doc = FoodDocument {
            id: ObjectId::new(),
            details: item.details.clone(),
            ordered_count: item.ordered_count,
        };
        self.foods.insert_one(&doc).await?;
        Ok(InsertSummary::new(FoodItemId::from_bytes(doc.id.bytes())))
    }

    #[instrument(skip(self, details), fields(id = %id))]
    async fn upsert_food(
        &self,
        id: FoodItemId,
        details: &FoodDetails,
    ) -> Result<UpdateSummary<FoodItemId>, RepositoryError> {
        let fields = mongodb::bson::to_document(details)?;
        // Drop the legacy owner keys so they can't shadow the new values on read.
        let update = doc! {
            "$set": fields,
            "$unset": { "name": "", "email": "" },
        };

        let result = self
            .foods
            .update_one(by_id(id.bytes()), update)
            .upsert(true)
            .await?;
        Ok(update_summary(&result))
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn record_order(
        &self,
        id: FoodItemId,
        update: OrderUpdate,
    ) -> Result<UpdateSummary<FoodItemId>, RepositoryError> {
        let update = doc! {
            "$set": {
                "orderedCount": i64::from(update.total_ordered_count),
                "quantity": i64::from(update.remaining_quantity),
            },
            "$unset": { "OrderedCount": "" },
        };

        let result = self.foods.update_one(by_id(id.bytes()), update).await?;
        Ok(update_summary(&result))
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_food(&self, id: FoodItemId) -> Result<DeleteSummary, RepositoryError> {
        let result = self.foods.delete_one(by_id(id.bytes())).await?;
        Ok(DeleteSummary::new(result.deleted_count))
    }

    #[instrument(skip(self))]
    async fn count_foods(&self) -> Result<u64, RepositoryError> {
        Ok(self.foods.estimated_document_count().await?)
    }

    #[instrument(skip(self))]
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl PurchaseRepository for MongoStore {
    #[instrument(skip(self), fields(buyer = %buyer))]
    async fn purchases_for_buyer(
        &self,
        buyer: &Email,
    ) -> Result<Vec<PurchaseRecord>, RepositoryError> {
        let docs: Vec<PurchaseDocument> = self
            .purchases
            .find(doc! { "buyerEmail": buyer.as_str() })
            .await?
            .try_collect()
            .await?;
        Ok(docs.into_iter().map(PurchaseRecord::from).collect())
    }

    #[instrument(skip(self, purchase), fields(food_id = %purchase.food_id))]
    async fn insert_purchase(
        &self,
        purchase: &PurchaseDetails,
    ) -> Result<InsertSummary<PurchaseId>, RepositoryError> {
        let doc = PurchaseDocument {
            id: ObjectId::new(),
            details: purchase.clone(),
        };
        self.purchases.insert_one(&doc).await?;
        Ok(InsertSummary::new(PurchaseId::from_bytes(doc.id.bytes())))
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_purchase(&self, id: PurchaseId) -> Result<DeleteSummary, RepositoryError> {
        let result = self.purchases.delete_one(by_id(id.bytes())).await?;
        Ok(DeleteSummary::new(result.deleted_count))
    }

    #[instrument(skip(self))]
    async fn count_purchases(&self) -> Result<u64, RepositoryError> {
        Ok(self.purchases.estimated_document_count().await?)
    }
}
