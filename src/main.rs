use dotenvy::dotenv;
use shop_store::{
    config::{catalog, database},
    core::seed,
    errors::Result,
};
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also come from the environment
    dotenv().ok();

    // 3. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 4. Seed the catalog when a seed file is present
    let path = catalog::catalog_path();
    if Path::new(&path).exists() {
        let config = catalog::load_catalog(&path)?;
        let summary = seed::seed_catalog(&db, &config)
            .await
            .inspect_err(|e| error!("Failed to seed catalog: {}", e))?;
        info!(
            "Seeded catalog from {}: {} products and {} collections created",
            path, summary.products_created, summary.collections_created
        );
    } else {
        warn!("No catalog file at {}, skipping seeding", path);
    }

    db.close().await?;
    Ok(())
}
