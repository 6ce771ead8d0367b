/// Database connection management and schema creation
pub mod database;

/// Catalog seed loading from catalog.toml
pub mod catalog;

/// Order policy flags from environment variables
pub mod orders;
