//! Catalog seed loading from catalog.toml
//!
//! The seed file lists products and collections that should exist when the store starts.
//! Collections name their products by product name so the file stays readable.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire catalog.toml file
#[derive(Debug, Default, Deserialize)]
pub struct CatalogConfig {
    /// Products to seed
    #[serde(default)]
    pub products: Vec<ProductSeed>,
    /// Collections to seed
    #[serde(default)]
    pub collections: Vec<CollectionSeed>,
}

/// A single product entry
#[derive(Debug, Deserialize, Clone)]
pub struct ProductSeed {
    /// Unique product name
    pub name: String,
    /// Unit price
    pub price: i64,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
}

/// A single collection entry
#[derive(Debug, Deserialize, Clone)]
pub struct CollectionSeed {
    /// Unique collection title
    pub title: String,
    /// Collection text
    pub text: String,
    /// Names of the member products
    #[serde(default)]
    pub products: Vec<String>,
}

/// Parses catalog configuration from a TOML string.
pub fn parse_catalog(contents: &str) -> Result<CatalogConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse catalog file: {e}"),
    })
}

/// Loads catalog configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!(
            "Failed to read catalog file {}: {e}",
            path.as_ref().display()
        ),
    })?;
    parse_catalog(&contents)
}

/// Path of the catalog file, from `CATALOG_CONFIG` or `catalog.toml`.
#[must_use]
pub fn catalog_path() -> String {
    std::env::var("CATALOG_CONFIG").unwrap_or_else(|_| "catalog.toml".to_string())
}
