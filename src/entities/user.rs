//! User entity - Local reference to an identity owned by an external provider.
//!
//! The store never authenticates users. It keeps one row per known identity so that
//! reviews and orders have something to reference and cascade from.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User reference model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user reference
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Username as known to the identity provider
    #[sea_orm(unique)]
    pub username: String,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user writes many reviews
    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
    /// One user places many orders
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
