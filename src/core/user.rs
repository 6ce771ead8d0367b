//! User reference operations.
//!
//! Users are owned by the external identity provider. These functions only keep the local
//! reference rows that reviews and orders point at, and run the cascade when an identity
//! goes away.

use crate::{
    entities::{Order, OrderedProduct, Review, User, order, ordered_product, review, user},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Registers a reference to an external identity.
///
/// # Errors
/// Returns `Error::Validation` if the username is empty or already registered.
#[instrument(skip(db))]
pub async fn register_user(db: &DatabaseConnection, username: &str) -> Result<user::Model> {
    let username = username.trim();
    if username.is_empty() {
        return Err(Error::validation("username", "must not be empty"));
    }

    if get_user_by_username(db, username).await?.is_some() {
        return Err(Error::validation(
            "username",
            format!("'{username}' is already registered"),
        ));
    }

    let user = user::ActiveModel {
        username: Set(username.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!(user_id = user.id, "Registered user reference");
    Ok(user)
}

/// Finds a user reference by id.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Finds a user reference by username.
pub async fn get_user_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Ensures a user exists, for use inside other write paths.
pub(crate) async fn require_user<C>(db: &C, user_id: i64) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::Reference {
            entity: "user",
            id: user_id,
        })
}

/// Deletes a user reference together with the user's reviews, orders and the line items
/// of those orders.
///
/// # Errors
/// Returns `Error::NotFound` if the user does not exist.
#[instrument(skip(db))]
pub async fn delete_user(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let user = User::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "user",
            id: user_id,
        })?;

    let order_ids: Vec<i64> = Order::find()
        .filter(order::Column::UserId.eq(user_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|o| o.id)
        .collect();

    let line_items = OrderedProduct::delete_many()
        .filter(ordered_product::Column::OrderId.is_in(order_ids))
        .exec(&txn)
        .await?
        .rows_affected;
    let orders = Order::delete_many()
        .filter(order::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?
        .rows_affected;
    let reviews = Review::delete_many()
        .filter(review::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?
        .rows_affected;
    user.delete(&txn).await?;

    txn.commit().await?;
    info!(user_id, orders, line_items, reviews, "Deleted user");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase, PaginatorTrait};

    #[tokio::test]
    async fn test_register_user_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = register_user(&db, "   ").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation {
                field: "username",
                ..
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_register_and_find_user() -> Result<()> {
        let db = setup_test_db().await?;

        let user = register_user(&db, "alice").await?;
        assert_eq!(user.username, "alice");

        let by_id = get_user_by_id(&db, user.id).await?.unwrap();
        assert_eq!(by_id, user);
        let by_name = get_user_by_username(&db, "alice").await?.unwrap();
        assert_eq!(by_name, user);
        assert!(get_user_by_id(&db, 999).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_register_duplicate_user_fails() -> Result<()> {
        let db = setup_test_db().await?;
        register_user(&db, "alice").await?;

        let result = register_user(&db, "alice").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation {
                field: "username",
                ..
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_user_cascades_reviews_and_orders() -> Result<()> {
        let (db, user, product) = setup_with_user_and_product().await?;
        let other = create_test_user(&db, "bob").await?;

        create_test_review(&db, user.id, product.id, 4).await?;
        create_test_review(&db, other.id, product.id, 2).await?;
        let order = create_test_order(&db, user.id).await?;
        crate::core::order::add_line_item(&db, Default::default(), order.id, product.id, 2)
            .await?;
        let other_order = create_test_order(&db, other.id).await?;
        crate::core::order::add_line_item(&db, Default::default(), other_order.id, product.id, 1)
            .await?;

        delete_user(&db, user.id).await?;

        assert!(get_user_by_id(&db, user.id).await?.is_none());
        assert_eq!(
            Review::find()
                .filter(review::Column::UserId.eq(user.id))
                .count(&db)
                .await?,
            0
        );
        assert!(Order::find_by_id(order.id).one(&db).await?.is_none());
        assert_eq!(
            OrderedProduct::find()
                .filter(ordered_product::Column::OrderId.eq(order.id))
                .count(&db)
                .await?,
            0
        );

        // The other user's data and the product are untouched
        assert_eq!(Review::find().count(&db).await?, 1);
        let kept = Order::find_by_id(other_order.id).one(&db).await?;
        assert!(kept.is_some());
        assert_eq!(OrderedProduct::find().count(&db).await?, 1);
        assert!(
            crate::core::product::get_product_by_id(&db, product.id)
                .await?
                .is_some()
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_user() -> Result<()> {
        let db = setup_test_db().await?;
        let result = delete_user(&db, 42).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                entity: "user",
                id: 42,
            }
        ));
        Ok(())
    }
}
