//! Order aggregate - Orders, their line items and their lifecycle status.
//!
//! An order exclusively owns its line items: deleting the order deletes them, while the
//! referenced products stay in the catalog. Two behaviours depend on [`OrderPolicy`]:
//!
//! * status changes are unguarded by default, so `DONE -> NEW` is accepted; the strict
//!   policy only allows the forward path `NEW -> IN_PROGRESS -> DONE`
//! * `total_price` is caller-maintained by default (a new order starts at 1, the value the
//!   schema has always defaulted to); with `recompute_total` it is derived as the sum of
//!   `quantity * price` inside every transaction that changes line items

use crate::{
    config::orders::OrderPolicy,
    core::{now, product::require_product, user::require_user},
    entities::{Order, OrderStatus, OrderedProduct, Product, order, ordered_product, product},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

fn validate_quantity(quantity: i32) -> Result<()> {
    if quantity < 0 {
        return Err(Error::validation(
            "quantity",
            format!("Quantity cannot be negative (got {quantity})"),
        ));
    }
    Ok(())
}

async fn require_order<C>(db: &C, order_id: i64) -> Result<order::Model>
where
    C: ConnectionTrait,
{
    Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or(Error::Reference {
            entity: "order",
            id: order_id,
        })
}

async fn find_order<C>(db: &C, order_id: i64) -> Result<order::Model>
where
    C: ConnectionTrait,
{
    Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "order",
            id: order_id,
        })
}

async fn find_line_item<C>(db: &C, line_item_id: i64) -> Result<ordered_product::Model>
where
    C: ConnectionTrait,
{
    OrderedProduct::find_by_id(line_item_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "line item",
            id: line_item_id,
        })
}

/// Sum of `quantity * price` over the order's line items.
async fn line_items_total<C>(db: &C, order_id: i64) -> Result<i64>
where
    C: ConnectionTrait,
{
    let rows = OrderedProduct::find()
        .filter(ordered_product::Column::OrderId.eq(order_id))
        .find_also_related(Product)
        .all(db)
        .await?;

    rows.iter()
        .filter_map(|(item, product)| {
            let price = product.as_ref()?.price;
            Some((item.quantity, price))
        })
        .try_fold(0_i64, |total, (quantity, price)| {
            i64::from(quantity)
                .checked_mul(price)
                .and_then(|line| total.checked_add(line))
        })
        .ok_or_else(|| Error::Integrity {
            message: format!("Total price of order {order_id} overflows"),
        })
}

/// Recomputes and stores `total_price` for an order, refreshing `updated_at`.
pub(crate) async fn recompute_total_in<C>(db: &C, order_id: i64) -> Result<order::Model>
where
    C: ConnectionTrait,
{
    let total = line_items_total(db, order_id).await?;
    let mut order: order::ActiveModel = find_order(db, order_id).await?.into();
    order.total_price = Set(total);
    order.updated_at = Set(now());
    let order = order.update(db).await?;
    debug!(order_id, total, "Recomputed order total");
    Ok(order)
}

/// Records a line item change on the owning order.
async fn after_line_items_changed<C>(db: &C, policy: OrderPolicy, order_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    if policy.recompute_total {
        recompute_total_in(db, order_id).await?;
    } else {
        let mut order: order::ActiveModel = find_order(db, order_id).await?.into();
        order.updated_at = Set(now());
        order.update(db).await?;
    }
    Ok(())
}

/// Creates a new order for a user with status `NEW`.
///
/// The initial total is [`order::DEFAULT_TOTAL_PRICE`], or 0 when the policy derives
/// totals from line items.
///
/// # Errors
/// Returns `Error::Reference` if the user does not exist.
#[instrument(skip(db))]
pub async fn create_order(
    db: &DatabaseConnection,
    policy: OrderPolicy,
    user_id: i64,
) -> Result<order::Model> {
    require_user(db, user_id).await?;

    let total_price = if policy.recompute_total {
        0
    } else {
        order::DEFAULT_TOTAL_PRICE
    };
    let now = now();
    let order = order::ActiveModel {
        user_id: Set(user_id),
        status: Set(OrderStatus::default()),
        total_price: Set(total_price),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(order_id = order.id, user_id, "Created order");
    Ok(order)
}

/// Retrieves an order by id.
pub async fn get_order_by_id(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Option<order::Model>> {
    Order::find_by_id(order_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all orders of a user, oldest first.
pub async fn get_orders_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<order::Model>> {
    Order::find()
        .filter(order::Column::UserId.eq(user_id))
        .order_by_asc(order::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the line items of an order in insertion order.
pub async fn get_line_items(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Vec<ordered_product::Model>> {
    OrderedProduct::find()
        .filter(ordered_product::Column::OrderId.eq(order_id))
        .order_by_asc(ordered_product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the products an order contains, following the line items.
///
/// A product listed in several line items is returned once per line item.
///
/// # Errors
/// Returns `Error::NotFound` if the order does not exist.
pub async fn get_order_products(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Vec<product::Model>> {
    let order = find_order(db, order_id).await?;
    order
        .find_related(Product)
        .order_by_asc(ordered_product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Adds a line item to an order.
///
/// The same product may be added more than once; each call creates its own line item.
///
/// # Errors
/// Returns `Error::Validation` if `quantity` is negative and `Error::Reference` if the
/// order or the product does not exist.
#[instrument(skip(db))]
pub async fn add_line_item(
    db: &DatabaseConnection,
    policy: OrderPolicy,
    order_id: i64,
    product_id: i64,
    quantity: i32,
) -> Result<ordered_product::Model> {
    validate_quantity(quantity)?;

    let txn = db.begin().await?;
    require_order(&txn, order_id).await?;
    require_product(&txn, product_id).await?;

    let item = ordered_product::ActiveModel {
        order_id: Set(order_id),
        product_id: Set(product_id),
        quantity: Set(quantity),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    after_line_items_changed(&txn, policy, order_id).await?;

    txn.commit().await?;
    info!(line_item_id = item.id, "Added line item");
    Ok(item)
}

/// Changes the quantity of an existing line item.
///
/// # Errors
/// Returns `Error::Validation` if `quantity` is negative and `Error::NotFound` if the line
/// item does not exist.
#[instrument(skip(db))]
pub async fn update_line_item_quantity(
    db: &DatabaseConnection,
    policy: OrderPolicy,
    line_item_id: i64,
    quantity: i32,
) -> Result<ordered_product::Model> {
    validate_quantity(quantity)?;

    let txn = db.begin().await?;
    let existing = find_line_item(&txn, line_item_id).await?;
    let order_id = existing.order_id;

    let mut item: ordered_product::ActiveModel = existing.into();
    item.quantity = Set(quantity);
    let item = item.update(&txn).await?;
    after_line_items_changed(&txn, policy, order_id).await?;

    txn.commit().await?;
    debug!(line_item_id, quantity, "Updated line item quantity");
    Ok(item)
}

/// Removes a line item from its order.
///
/// # Errors
/// Returns `Error::NotFound` if the line item does not exist.
#[instrument(skip(db))]
pub async fn remove_line_item(
    db: &DatabaseConnection,
    policy: OrderPolicy,
    line_item_id: i64,
) -> Result<()> {
    let txn = db.begin().await?;
    let item = find_line_item(&txn, line_item_id).await?;
    let order_id = item.order_id;
    item.delete(&txn).await?;
    after_line_items_changed(&txn, policy, order_id).await?;

    txn.commit().await?;
    info!(line_item_id, order_id, "Removed line item");
    Ok(())
}

/// Sets the status of an order.
///
/// Without `policy.strict_status` every status can follow every other one, including
/// `DONE -> NEW`.
///
/// # Errors
/// Returns `Error::NotFound` if the order does not exist and
/// `Error::InvalidStatusTransition` if the strict policy rejects the change.
#[instrument(skip(db))]
pub async fn set_status(
    db: &DatabaseConnection,
    policy: OrderPolicy,
    order_id: i64,
    status: OrderStatus,
) -> Result<order::Model> {
    let existing = find_order(db, order_id).await?;
    if policy.strict_status && !existing.status.can_transition_to(status) {
        return Err(Error::InvalidStatusTransition {
            from: existing.status,
            to: status,
        });
    }

    let from = existing.status;
    let mut order: order::ActiveModel = existing.into();
    order.status = Set(status);
    order.updated_at = Set(now());
    let order = order.update(db).await?;

    info!(order_id, %from, to = %status, "Changed order status");
    Ok(order)
}

/// Stores a caller-computed total for an order.
///
/// # Errors
/// Returns `Error::Validation` if the total is negative or if the policy derives totals
/// from line items, and `Error::NotFound` if the order does not exist.
#[instrument(skip(db))]
pub async fn set_total_price(
    db: &DatabaseConnection,
    policy: OrderPolicy,
    order_id: i64,
    total_price: i64,
) -> Result<order::Model> {
    if total_price < 0 {
        return Err(Error::validation(
            "total_price",
            format!("Total price cannot be negative (got {total_price})"),
        ));
    }
    if policy.recompute_total {
        return Err(Error::validation(
            "total_price",
            "Total price is derived from line items and cannot be set directly",
        ));
    }

    let mut order: order::ActiveModel = find_order(db, order_id).await?.into();
    order.total_price = Set(total_price);
    order.updated_at = Set(now());
    order.update(db).await.map_err(Into::into)
}

/// Recomputes `total_price` from the line items, whatever the policy.
///
/// # Errors
/// Returns `Error::NotFound` if the order does not exist.
#[instrument(skip(db))]
pub async fn recompute_total_price(db: &DatabaseConnection, order_id: i64) -> Result<order::Model> {
    let txn = db.begin().await?;
    let order = recompute_total_in(&txn, order_id).await?;
    txn.commit().await?;
    Ok(order)
}

/// Deletes an order and all of its line items. Referenced products are kept.
///
/// # Errors
/// Returns `Error::NotFound` if the order does not exist.
#[instrument(skip(db))]
pub async fn delete_order(db: &DatabaseConnection, order_id: i64) -> Result<()> {
    let txn = db.begin().await?;
    let order = find_order(&txn, order_id).await?;

    let line_items = OrderedProduct::delete_many()
        .filter(ordered_product::Column::OrderId.eq(order_id))
        .exec(&txn)
        .await?
        .rows_affected;
    order.delete(&txn).await?;

    txn.commit().await?;
    info!(order_id, line_items, "Deleted order");
    Ok(())
}
