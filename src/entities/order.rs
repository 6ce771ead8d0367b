//! Order entity - A user's order and its lifecycle status.
//!
//! Line items live in [`super::ordered_product`]. `total_price` is stored on the order
//! itself and is only derived from the line items when the order policy asks for it
//! (see [`crate::config::orders::OrderPolicy`]).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value stored in `total_price` for a freshly created order
pub const DEFAULT_TOTAL_PRICE: i64 = 1;

/// Lifecycle status of an order.
///
/// The intended path is `New -> InProgress -> Done`; whether that path is enforced
/// depends on the order policy.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(11))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order has been placed
    #[sea_orm(string_value = "NEW")]
    New,
    /// Order is being worked on
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    /// Order is complete
    #[sea_orm(string_value = "DONE")]
    Done,
}

impl OrderStatus {
    /// Stored representation of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }

    /// Human readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::InProgress => "In progress",
            Self::Done => "Done",
        }
    }

    /// Whether `next` follows `self` on the forward path. Writing the same status again
    /// is always allowed.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::New, Self::New | Self::InProgress)
                | (Self::InProgress, Self::InProgress | Self::Done)
                | (Self::Done, Self::Done)
        )
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::New
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Customer who placed the order
    pub user_id: i64,
    /// Current lifecycle status
    pub status: OrderStatus,
    /// Total price in the smallest currency unit
    pub total_price: i64,
    /// When the order was created
    pub created_at: DateTime,
    /// When the order or its line items were last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    /// One order owns many line items
    #[sea_orm(has_many = "super::ordered_product::Entity")]
    OrderedProducts,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::ordered_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderedProducts.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        super::ordered_product::Relation::Product.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::ordered_product::Relation::Order.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order of user {} for {}", self.user_id, self.total_price)
    }
}
