//! Catalog seeding from a [`CatalogConfig`].
//!
//! Seeding is additive: products and collections that already exist (by name or title)
//! are left alone, so the same file can be applied on every start.

use crate::{
    config::catalog::CatalogConfig,
    core::{collection, product},
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use tracing::{debug, info, instrument};

/// Counts of what a seeding run created and skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Products inserted by this run
    pub products_created: usize,
    /// Products already present
    pub products_skipped: usize,
    /// Collections inserted by this run
    pub collections_created: usize,
    /// Collections already present
    pub collections_skipped: usize,
}

/// Creates the products and collections from `config` that do not exist yet.
///
/// # Errors
/// Returns `Error::Config` if a collection names a product that is neither in the
/// database nor in the file, and any validation error raised while creating rows.
#[instrument(skip_all)]
pub async fn seed_catalog(db: &DatabaseConnection, config: &CatalogConfig) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for seed in &config.products {
        if product::get_product_by_name(db, &seed.name)
            .await?
            .is_some()
        {
            debug!("Product '{}' already exists, skipping", seed.name);
            summary.products_skipped += 1;
            continue;
        }
        product::create_product(db, &seed.name, seed.description.as_deref(), seed.price).await?;
        summary.products_created += 1;
    }

    for seed in &config.collections {
        if collection::get_collection_by_title(db, &seed.title)
            .await?
            .is_some()
        {
            debug!("Collection '{}' already exists, skipping", seed.title);
            summary.collections_skipped += 1;
            continue;
        }

        let mut product_ids = Vec::with_capacity(seed.products.len());
        for name in &seed.products {
            let product = product::get_product_by_name(db, name)
                .await?
                .ok_or_else(|| Error::Config {
                    message: format!(
                        "Collection '{}' lists unknown product '{name}'",
                        seed.title
                    ),
                })?;
            product_ids.push(product.id);
        }
        collection::create_collection(db, &seed.title, &seed.text, &product_ids).await?;
        summary.collections_created += 1;
    }

    info!(?summary, "Catalog seeding finished");
    Ok(summary)
}
