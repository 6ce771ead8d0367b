//! Shared test utilities for the shop store.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    config::{database, orders::OrderPolicy},
    core::{order, product, review, user},
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Routes tracing output through the test harness. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = database::connect("sqlite::memory:").await?;
    database::create_tables(&db).await?;
    Ok(db)
}

/// Registers a test user reference.
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
) -> Result<entities::user::Model> {
    user::register_user(db, username).await
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * description: none
/// * price: 10
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::product::Model> {
    product::create_product(db, name, None, 10).await
}

/// Creates a test product with custom price.
pub async fn create_custom_product(
    db: &DatabaseConnection,
    name: &str,
    price: i64,
) -> Result<entities::product::Model> {
    product::create_product(db, name, None, price).await
}

/// Creates an order under the default (permissive) policy.
pub async fn create_test_order(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<entities::order::Model> {
    order::create_order(db, OrderPolicy::default(), user_id).await
}

/// Creates a review with a fixed text.
pub async fn create_test_review(
    db: &DatabaseConnection,
    user_id: i64,
    product_id: i64,
    rating: i32,
) -> Result<entities::review::Model> {
    review::create_review(db, user_id, product_id, "Test review", rating).await
}

/// Sets up a database with one user named `"test_user"`.
pub async fn setup_with_user() -> Result<(DatabaseConnection, entities::user::Model)> {
    let db = setup_test_db().await?;
    let user = create_test_user(&db, "test_user").await?;
    Ok((db, user))
}

/// Sets up a database with one user and one product named `"Test Product"` priced 10.
pub async fn setup_with_user_and_product() -> Result<(
    DatabaseConnection,
    entities::user::Model,
    entities::product::Model,
)> {
    let (db, user) = setup_with_user().await?;
    let product = create_test_product(&db, "Test Product").await?;
    Ok((db, user, product))
}
