//! mongo-controller - inspect a MongoDB database
//!
//! Connects with settings from the environment, prints the estimated
//! document count of every collection in the target database, then
//! disconnects.

use mongodb::bson::Document;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mongo_controller::config::MongoConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loads .env too, so RUST_LOG from it is seen by the filter below
    let config = MongoConfig::from_env()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mongo_controller=info,mongodb=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Configuration loaded, target database: {}", config.database);

    let mut controller =
        mongo_controller::create_client(&config.uri, &config.database, Some(&config.options))
            .await?;

    info!("Connecting to MongoDB...");
    controller.connect().await?;

    let names = controller
        .unchecked_database()?
        .list_collection_names()
        .await?;

    if names.is_empty() {
        info!("No collections in {}", config.database);
    }

    for name in &names {
        let count = controller
            .collection::<Document>(name)?
            .estimated_document_count()
            .await?;
        info!("{}: ~{} documents", name, count);
    }

    if !controller.disconnect().await {
        warn!("Connection could not be closed cleanly");
    }

    Ok(())
}
