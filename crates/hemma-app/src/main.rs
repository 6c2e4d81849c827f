//! Hemma entry point.
//!
//! Owns the application lifecycle: configuration, logging, database, state
//! service. The presentation layer attaches to the [`AppHandle`] it creates.

use tracing::{error, info};

use hemma_app::{init_tracing, AppConfig, AppService, StoreManager};
use hemma_db::Database;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load_or_default(None);
    init_tracing(&config.logging.filter);

    info!("Starting Hemma storefront core");

    let db_config = config.db_config()?;
    info!(path = %db_config.database_path.display(), "Database path determined");

    let db = Database::new(db_config).await?;

    let manager = StoreManager::new(db.clone()).with_demo_seed(config.catalog.seed_demo_products);
    let handle = AppService::new(manager, &config.service_config()).start();

    if let Err(e) = handle.load_catalog().await {
        error!(error = %e, "Initial catalog load failed");
    }

    info!(
        products = handle.products().borrow().len(),
        favorites = handle.favorites().borrow().len(),
        "Storefront ready"
    );

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");

    handle.shutdown().await?;
    db.close().await;

    Ok(())
}
