//! Collection membership - Join table between collections and products.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Membership row, keyed by both sides
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collection_products")]
pub struct Model {
    /// Collection side of the link
    #[sea_orm(primary_key, auto_increment = false)]
    pub collection_id: i64,
    /// Product side of the link
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: i64,
}

/// Both sides of the membership cascade on delete
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The collection being populated
    #[sea_orm(
        belongs_to = "super::collection::Entity",
        from = "Column::CollectionId",
        to = "super::collection::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Collection,
    /// The member product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Product,
}

impl Related<super::collection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collection.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
