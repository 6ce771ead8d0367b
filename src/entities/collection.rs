//! Collection entity - A curated, titled grouping of products.
//!
//! Membership is stored in [`super::collection_product`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of characters in a collection title
pub const TITLE_MAX_CHARS: usize = 40;

/// Collection database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collections")]
pub struct Model {
    /// Unique identifier for the collection
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique title (e.g., "Summer picks")
    #[sea_orm(unique, column_type = "String(StringLen::N(40))")]
    pub title: String,
    /// Collection text
    #[sea_orm(column_type = "Text")]
    pub text: String,
    /// When the collection was created
    pub created_at: DateTime,
    /// When the collection or its membership was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Collection and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One collection has many memberships
    #[sea_orm(has_many = "super::collection_product::Entity")]
    CollectionProducts,
}

impl Related<super::collection_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CollectionProducts.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        super::collection_product::Relation::Product.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::collection_product::Relation::Collection.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}
