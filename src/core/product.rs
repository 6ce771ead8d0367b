//! Catalog business logic - Handles all product-related operations.
//!
//! Products carry a unique name of at most 30 characters and a non-negative integer price.
//! Deleting a product is a hard delete that also removes every review, order line item
//! and collection membership referencing it.

use crate::{
    config::orders::OrderPolicy,
    core::{now, order::recompute_total_in},
    entities::{
        CollectionProduct, OrderedProduct, Product, Review, collection_product, ordered_product,
        product, review,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

/// Optional changes applied by [`update_product`]. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    /// New unique name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New price
    pub price: Option<i64>,
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("name", "Product name cannot be empty"));
    }
    let len = name.chars().count();
    if len > product::NAME_MAX_CHARS {
        return Err(Error::validation(
            "name",
            format!(
                "Product name is {len} characters long, the limit is {}",
                product::NAME_MAX_CHARS
            ),
        ));
    }
    Ok(name.to_string())
}

fn validate_price(price: i64) -> Result<()> {
    if price < 0 {
        return Err(Error::validation(
            "price",
            format!("Product price cannot be negative (got {price})"),
        ));
    }
    Ok(())
}

async fn ensure_name_free<C>(db: &C, name: &str, except_id: Option<i64>) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut query = Product::find().filter(product::Column::Name.eq(name));
    if let Some(id) = except_id {
        query = query.filter(product::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(Error::validation(
            "name",
            format!("A product named '{name}' already exists"),
        ));
    }
    Ok(())
}

/// Retrieves all products, ordered alphabetically by name.
pub async fn get_all_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a product by its unique name.
pub async fn get_product_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<product::Model>> {
    Product::find()
        .filter(product::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a product by id.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Ensures a product exists, for use inside other write paths.
pub(crate) async fn require_product<C>(db: &C, product_id: i64) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::Reference {
            entity: "product",
            id: product_id,
        })
}

/// Creates a new product, performing input validation.
///
/// The name is trimmed before it is checked and stored. A missing description is stored
/// as an empty string.
///
/// # Errors
/// Returns `Error::Validation` if:
/// - The name is empty or whitespace-only
/// - The name is longer than 30 characters
/// - Another product already has this name
/// - The price is negative
#[instrument(skip(db, description))]
pub async fn create_product(
    db: &DatabaseConnection,
    name: &str,
    description: Option<&str>,
    price: i64,
) -> Result<product::Model> {
    let name = validate_name(name)?;
    validate_price(price)?;
    ensure_name_free(db, &name, None).await?;

    let now = now();
    let product = product::ActiveModel {
        name: Set(name),
        description: Set(description.unwrap_or_default().to_string()),
        price: Set(price),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(product_id = product.id, "Created product");
    Ok(product)
}

/// Applies `changes` to an existing product and refreshes `updated_at`.
///
/// # Errors
/// Returns `Error::Validation` for the same field rules as [`create_product`] and
/// `Error::NotFound` if the product does not exist.
#[instrument(skip(db))]
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    changes: ProductChanges,
) -> Result<product::Model> {
    let name = changes.name.as_deref().map(validate_name).transpose()?;
    if let Some(price) = changes.price {
        validate_price(price)?;
    }

    let mut product: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "product",
            id: product_id,
        })?
        .into();

    if let Some(name) = name {
        ensure_name_free(db, &name, Some(product_id)).await?;
        product.name = Set(name);
    }
    if let Some(description) = changes.description {
        product.description = Set(description);
    }
    if let Some(price) = changes.price {
        product.price = Set(price);
    }
    product.updated_at = Set(now());

    let updated = product.update(db).await?;
    debug!(product_id, "Updated product");
    Ok(updated)
}

/// Deletes a product and everything that references it.
///
/// Reviews, order line items and collection memberships for the product are removed in the
/// same transaction. Orders themselves survive; with `policy.recompute_total` their totals
/// are recomputed from the remaining line items.
///
/// # Errors
/// Returns `Error::NotFound` if the product does not exist.
#[instrument(skip(db))]
pub async fn delete_product(
    db: &DatabaseConnection,
    policy: OrderPolicy,
    product_id: i64,
) -> Result<()> {
    let txn = db.begin().await?;

    let product = Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "product",
            id: product_id,
        })?;

    let affected_orders: Vec<i64> = OrderedProduct::find()
        .select_only()
        .column(ordered_product::Column::OrderId)
        .distinct()
        .filter(ordered_product::Column::ProductId.eq(product_id))
        .into_tuple()
        .all(&txn)
        .await?;

    let reviews = Review::delete_many()
        .filter(review::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await?
        .rows_affected;
    let line_items = OrderedProduct::delete_many()
        .filter(ordered_product::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await?
        .rows_affected;
    let memberships = CollectionProduct::delete_many()
        .filter(collection_product::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await?
        .rows_affected;
    product.delete(&txn).await?;

    if policy.recompute_total {
        for order_id in &affected_orders {
            recompute_total_in(&txn, *order_id).await?;
        }
    }

    txn.commit().await?;
    info!(reviews, line_items, memberships, "Deleted product");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{collection, order};
    use crate::entities::{Collection, OrderStatus};
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase, PaginatorTrait};

    #[tokio::test]
    async fn test_create_product_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        // Test empty name validation
        let result = create_product(&db, "", None, 10).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "name", .. }
        ));

        // Test whitespace-only name validation
        let result = create_product(&db, "   ", None, 10).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "name", .. }
        ));

        // Test name length validation
        let result = create_product(&db, &"x".repeat(31), None, 10).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "name", .. }
        ));

        // Test negative price validation
        let result = create_product(&db, "Widget", None, -1).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "price", .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let product = create_product(&db, "  Widget ", Some("Small and useful"), 100).await?;
        assert_eq!(product.name, "Widget");
        assert_eq!(product.description, "Small and useful");
        assert_eq!(product.price, 100);
        assert_eq!(product.created_at, product.updated_at);
        assert_eq!(product.to_string(), "Widget");

        let free = create_product(&db, "Sticker", None, 0).await?;
        assert_eq!(free.price, 0);
        assert_eq!(free.description, "");

        Ok(())
    }

    #[tokio::test]
    async fn test_name_length_boundary() -> Result<()> {
        let db = setup_test_db().await?;

        let thirty = "a".repeat(30);
        let product = create_product(&db, &thirty, None, 1).await?;
        assert_eq!(product.name.chars().count(), 30);

        // Multibyte characters count as one each
        let cyrillic = "т".repeat(30);
        create_product(&db, &cyrillic, None, 1).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_product_name_fails() -> Result<()> {
        let db = setup_test_db().await?;
        create_product(&db, "Widget", None, 100).await?;

        let result = create_product(&db, "Widget", None, 200).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "name", .. }
        ));
        assert_eq!(get_all_products(&db).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_unique_index_violation_names_the_field() -> Result<()> {
        let db = setup_test_db().await?;
        create_product(&db, "Widget", None, 100).await?;

        // Skips the name check so the unique index rejects the row
        let now = now();
        let result = product::ActiveModel {
            name: Set("Widget".to_string()),
            description: Set(String::new()),
            price: Set(200),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await;

        let err = Error::from(result.unwrap_err());
        assert!(matches!(err, Error::Validation { field: "name", .. }));
        assert_eq!(get_all_products(&db).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_product_by_name_and_id() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_product(&db, "Widget", None, 100).await?;

        let found = get_product_by_name(&db, "Widget").await?.unwrap();
        assert_eq!(found.id, created.id);
        assert!(get_product_by_name(&db, "Gizmo").await?.is_none());

        let by_id = get_product_by_id(&db, created.id).await?.unwrap();
        assert_eq!(by_id, created);
        assert!(get_product_by_id(&db, 999).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_products_ordered_by_name() -> Result<()> {
        let db = setup_test_db().await?;
        create_product(&db, "Widget", None, 1).await?;
        create_product(&db, "Anvil", None, 2).await?;
        create_product(&db, "Gadget", None, 3).await?;

        let names: Vec<String> = get_all_products(&db)
            .await?
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Anvil", "Gadget", "Widget"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_product(&db, "Widget", None, 100).await?;

        let updated = update_product(
            &db,
            product.id,
            ProductChanges {
                name: Some("Widget Pro".to_string()),
                price: Some(150),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.name, "Widget Pro");
        assert_eq!(updated.price, 150);
        assert_eq!(updated.description, "");
        assert_eq!(updated.created_at, product.created_at);
        assert!(updated.updated_at >= product.updated_at);

        // Renaming to its own name is not a conflict
        update_product(
            &db,
            product.id,
            ProductChanges {
                name: Some("Widget Pro".to_string()),
                ..Default::default()
            },
        )
        .await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_rejects_taken_name_and_bad_price() -> Result<()> {
        let db = setup_test_db().await?;
        create_product(&db, "Widget", None, 100).await?;
        let gadget = create_product(&db, "Gadget", None, 200).await?;

        let result = update_product(
            &db,
            gadget.id,
            ProductChanges {
                name: Some("Widget".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "name", .. }
        ));

        let result = update_product(
            &db,
            gadget.id,
            ProductChanges {
                price: Some(-5),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "price", .. }
        ));

        // Nothing was written by the failed updates
        let unchanged = get_product_by_id(&db, gadget.id).await?.unwrap();
        assert_eq!(unchanged, gadget);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_product() -> Result<()> {
        let db = setup_test_db().await?;
        let result = update_product(&db, 999, ProductChanges::default()).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                entity: "product",
                id: 999,
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product_removes_all_dependents() -> Result<()> {
        let (db, user, product) = setup_with_user_and_product().await?;
        let keep = create_custom_product(&db, "Keeper", 5).await?;

        create_test_review(&db, user.id, product.id, 5).await?;
        create_test_review(&db, user.id, keep.id, 3).await?;
        let order = create_test_order(&db, user.id).await?;
        order::add_line_item(&db, OrderPolicy::default(), order.id, product.id, 2).await?;
        order::add_line_item(&db, OrderPolicy::default(), order.id, keep.id, 1).await?;
        let picks = collection::create_collection(
            &db,
            "Picks",
            "Our picks",
            &[product.id, keep.id],
        )
        .await?;

        delete_product(&db, OrderPolicy::default(), product.id).await?;

        assert!(get_product_by_id(&db, product.id).await?.is_none());
        assert_eq!(
            Review::find()
                .filter(review::Column::ProductId.eq(product.id))
                .count(&db)
                .await?,
            0
        );
        assert_eq!(
            OrderedProduct::find()
                .filter(ordered_product::Column::ProductId.eq(product.id))
                .count(&db)
                .await?,
            0
        );
        assert_eq!(
            CollectionProduct::find()
                .filter(collection_product::Column::ProductId.eq(product.id))
                .count(&db)
                .await?,
            0
        );

        // Unrelated rows survive
        assert_eq!(Review::find().count(&db).await?, 1);
        assert_eq!(order::get_line_items(&db, order.id).await?.len(), 1);
        assert!(Collection::find_by_id(picks.id).one(&db).await?.is_some());
        let members = collection::get_collection_products(&db, picks.id).await?;
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, keep.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_widget_leaves_empty_order() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "U").await?;
        let widget = create_product(&db, "Widget", None, 100).await?;
        let order = order::create_order(&db, OrderPolicy::default(), user.id).await?;
        order::add_line_item(&db, OrderPolicy::default(), order.id, widget.id, 3).await?;

        delete_product(&db, OrderPolicy::default(), widget.id).await?;

        let remaining = order::get_order_by_id(&db, order.id).await?.unwrap();
        assert_eq!(remaining.status, OrderStatus::New);
        assert!(order::get_line_items(&db, order.id).await?.is_empty());
        // The stored total is caller-maintained and is not touched by the cascade
        assert_eq!(remaining.total_price, order.total_price);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product_recomputes_totals_when_enabled() -> Result<()> {
        let policy = OrderPolicy::strict();
        let (db, user, widget) = setup_with_user_and_product().await?;
        let gadget = create_custom_product(&db, "Gadget", 7).await?;
        let order = order::create_order(&db, policy, user.id).await?;
        order::add_line_item(&db, policy, order.id, widget.id, 2).await?;
        order::add_line_item(&db, policy, order.id, gadget.id, 3).await?;
        let before = order::get_order_by_id(&db, order.id).await?.unwrap();
        assert_eq!(before.total_price, 2 * widget.price + 21);

        delete_product(&db, policy, widget.id).await?;

        let after = order::get_order_by_id(&db, order.id).await?.unwrap();
        assert_eq!(after.total_price, 21);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_product() -> Result<()> {
        let db = setup_test_db().await?;
        let result = delete_product(&db, OrderPolicy::default(), 7).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                entity: "product",
                id: 7,
            }
        ));
        Ok(())
    }
}
