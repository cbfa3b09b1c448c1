//! Seed the food collection from a YAML file.
//!
//! The file is a YAML list of food items in the same shape the API accepts
//! on `POST /v1/api/foodItems`:
//!
//! ```yaml
//! - foodName: Mango Sticky Rice
//!   foodImage: https://img.example/mango.jpg
//!   foodCategory: Dessert
//!   quantity: 12
//!   price: "6.50"
//!   ownerName: Nok
//!   ownerEmail: nok@kitchen.io
//!   foodOrigin: Thailand
//!   description: Sweet coconut rice
//! ```
//!
//! The whole file is parsed and validated before the database is touched.

use std::path::Path;

use thiserror::Error;
use tracing::{error, info};

use yamweb_core::Email;
use yamweb_server::db::FoodRepository;
use yamweb_server::models::NewFoodItem;

/// Errors that stop a seed run before anything is written.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0} validation errors found")]
    Invalid(usize),
}

/// Check every item, returning one message per problem found.
pub fn validate(items: &[NewFoodItem]) -> Vec<String> {
    let mut errors = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let details = &item.details;
        let label = if details.food_name.trim().is_empty() {
            format!("item {index}")
        } else {
            format!("item {index} ({})", details.food_name)
        };

        if details.food_name.trim().is_empty() {
            errors.push(format!("{label}: foodName is empty"));
        }
        if details.food_category.trim().is_empty() {
            errors.push(format!("{label}: foodCategory is empty"));
        }
        if details.price.is_sign_negative() {
            errors.push(format!("{label}: price is negative"));
        }
        if let Err(e) = Email::parse(&details.owner_email) {
            errors.push(format!("{label}: ownerEmail: {e}"));
        }
    }

    errors
}

/// Parse and validate a seed file's contents.
///
/// # Errors
///
/// Returns `SeedError::Yaml` if the document doesn't parse and
/// `SeedError::Invalid` if any item fails validation.
pub fn parse(content: &str) -> Result<Vec<NewFoodItem>, SeedError> {
    let items: Vec<NewFoodItem> = serde_yaml::from_str(content)?;

    let errors = validate(&items);
    if !errors.is_empty() {
        error!("Seed file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(SeedError::Invalid(errors.len()));
    }

    Ok(items)
}

/// Insert the food items listed in `file_path`.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML file
/// * `clear_existing` - If true, delete every existing food item first
///
/// # Errors
///
/// Returns an error if the file is missing or invalid, or a database
/// operation fails.
pub async fn foods(
    file_path: &str,
    clear_existing: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(SeedError::NotFound(file_path.to_owned()).into());
    }

    info!(path = %file_path, "Loading food items from file");
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(SeedError::from)?;
    let items = parse(&content)?;
    info!(items = items.len(), "Seed file validated");

    let store = super::connect().await?;

    if clear_existing {
        let removed = store.clear_foods().await?;
        info!(removed, "Cleared existing food items");
    }

    for item in &items {
        let summary = store.insert_food(item).await?;
        info!(id = %summary.inserted_id, name = %item.details.food_name, "Inserted");
    }

    info!("Seeding complete: {} food items inserted", items.len());
    store.client().clone().shutdown().await;
    Ok(())
}
