//! Product entity - Catalog items with a unique name and an integer price.
//!
//! Products are shared: reviews, order line items and collections all point at them,
//! and deleting a product removes every one of those dependent rows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of characters in a product name
pub const NAME_MAX_CHARS: usize = 30;

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique name of the product (e.g., "Widget")
    #[sea_orm(unique, column_type = "String(StringLen::N(30))")]
    pub name: String,
    /// Free-form description, empty when not provided
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Unit price in the smallest currency unit
    pub price: i64,
    /// When the product was created
    pub created_at: DateTime,
    /// When the product was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product has many reviews
    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
    /// One product appears in many order line items
    #[sea_orm(has_many = "super::ordered_product::Entity")]
    OrderedProducts,
    /// One product has many collection memberships
    #[sea_orm(has_many = "super::collection_product::Entity")]
    CollectionProducts,
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::ordered_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderedProducts.def()
    }
}

impl Related<super::collection_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CollectionProducts.def()
    }
}

impl Related<super::collection::Entity> for Entity {
    fn to() -> RelationDef {
        super::collection_product::Relation::Collection.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::collection_product::Relation::Product.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
