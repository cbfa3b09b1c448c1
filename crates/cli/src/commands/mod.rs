//! CLI subcommands.

pub mod seed;
pub mod stats;

use yamweb_server::config::MongoConfig;
use yamweb_server::db::MongoStore;

/// Connect to the configured MongoDB database and check it answers.
async fn connect() -> Result<MongoStore, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = MongoConfig::from_env()?;

    tracing::info!(database = %config.database, "Connecting to MongoDB...");
    let store = MongoStore::connect(&config).await?;
    yamweb_server::db::FoodRepository::ping(&store).await?;
    Ok(store)
}
