//! Database configuration module for the shop store.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so foreign keys and their `ON DELETE CASCADE` rules come straight from the entity
//! relations without hand-written SQL.

use crate::entities::{Collection, CollectionProduct, Order, OrderedProduct, Product, Review, User};
use crate::errors::{Error, Result};
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, EntityTrait, Schema};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Default database location when `DATABASE_URL` is not set
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/shop.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
/// The directory holding a `SQLite` file is created when missing.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if let Some(dir) = sqlite_file_dir(&database_url) {
        std::fs::create_dir_all(dir).map_err(|e| Error::Config {
            message: format!("Failed to create directory {}: {e}", dir.display()),
        })?;
    }
    connect(&database_url).await
}

/// Parent directory of the file behind a `sqlite://` URL, if it has one.
fn sqlite_file_dir(database_url: &str) -> Option<&Path> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next().unwrap_or(path);
    Path::new(path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}

/// Connects to the given URL. On `SQLite`, foreign key enforcement is switched on.
#[instrument]
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Opening database connection");
    let db = Database::connect(database_url).await?;
    if db.get_database_backend() == DatabaseBackend::Sqlite {
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
    }
    Ok(db)
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    debug!("Ensured table {}", entity.table_name());
    Ok(())
}

/// Creates all tables if they do not exist yet.
///
/// Referenced tables are created before the tables that point at them.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, User).await?;
    create_table(db, &schema, Product).await?;
    create_table(db, &schema, Review).await?;
    create_table(db, &schema, Order).await?;
    create_table(db, &schema, OrderedProduct).await?;
    create_table(db, &schema, Collection).await?;
    create_table(db, &schema, CollectionProduct).await?;

    info!("Database tables ensured");
    Ok(())
}
