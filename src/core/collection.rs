//! Collection business logic - Curated groupings of products.
//!
//! Collections have a unique title of at most 40 characters. Membership is a plain link
//! table; linking is idempotent and there is no limit on collection size.

use crate::{
    core::{now, product::require_product},
    entities::{Collection, CollectionProduct, Product, collection, collection_product, product},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::validation(
            "title",
            "Collection title cannot be empty",
        ));
    }
    let len = title.chars().count();
    if len > collection::TITLE_MAX_CHARS {
        return Err(Error::validation(
            "title",
            format!(
                "Collection title is {len} characters long, the limit is {}",
                collection::TITLE_MAX_CHARS
            ),
        ));
    }
    Ok(title.to_string())
}

fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::validation("text", "Collection text cannot be empty"));
    }
    Ok(())
}

async fn ensure_title_free<C>(db: &C, title: &str, except_id: Option<i64>) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut query = Collection::find().filter(collection::Column::Title.eq(title));
    if let Some(id) = except_id {
        query = query.filter(collection::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(Error::validation(
            "title",
            format!("A collection titled '{title}' already exists"),
        ));
    }
    Ok(())
}

async fn find_collection<C>(db: &C, collection_id: i64) -> Result<collection::Model>
where
    C: ConnectionTrait,
{
    Collection::find_by_id(collection_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "collection",
            id: collection_id,
        })
}

async fn is_linked<C>(db: &C, collection_id: i64, product_id: i64) -> Result<bool>
where
    C: ConnectionTrait,
{
    Ok(CollectionProduct::find_by_id((collection_id, product_id))
        .one(db)
        .await?
        .is_some())
}

async fn link<C>(db: &C, collection_id: i64, product_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    CollectionProduct::insert(collection_product::ActiveModel {
        collection_id: Set(collection_id),
        product_id: Set(product_id),
    })
    .exec_without_returning(db)
    .await?;
    Ok(())
}

async fn touch<C>(db: &C, existing: collection::Model) -> Result<collection::Model>
where
    C: ConnectionTrait,
{
    let mut collection: collection::ActiveModel = existing.into();
    collection.updated_at = Set(now());
    collection.update(db).await.map_err(Into::into)
}

/// Creates a collection containing `product_ids`.
///
/// Duplicate ids are linked once.
///
/// # Errors
/// Returns `Error::Validation` if the title is empty, longer than 40 characters or
/// already taken, or the text is empty, and `Error::Reference` if a product does not
/// exist. Nothing is written on failure.
#[instrument(skip(db, text))]
pub async fn create_collection(
    db: &DatabaseConnection,
    title: &str,
    text: &str,
    product_ids: &[i64],
) -> Result<collection::Model> {
    let title = validate_title(title)?;
    validate_text(text)?;

    let txn = db.begin().await?;
    ensure_title_free(&txn, &title, None).await?;

    let now = now();
    let collection = collection::ActiveModel {
        title: Set(title),
        text: Set(text.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut linked = Vec::with_capacity(product_ids.len());
    for &product_id in product_ids {
        if linked.contains(&product_id) {
            continue;
        }
        require_product(&txn, product_id).await?;
        link(&txn, collection.id, product_id).await?;
        linked.push(product_id);
    }

    txn.commit().await?;
    info!(collection_id = collection.id, "Created collection");
    Ok(collection)
}

/// Retrieves a collection by id.
pub async fn get_collection_by_id(
    db: &DatabaseConnection,
    collection_id: i64,
) -> Result<Option<collection::Model>> {
    Collection::find_by_id(collection_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a collection by its unique title.
pub async fn get_collection_by_title(
    db: &DatabaseConnection,
    title: &str,
) -> Result<Option<collection::Model>> {
    Collection::find()
        .filter(collection::Column::Title.eq(title.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all collections ordered by title.
pub async fn get_all_collections(db: &DatabaseConnection) -> Result<Vec<collection::Model>> {
    Collection::find()
        .order_by_asc(collection::Column::Title)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Replaces the title and text of a collection.
///
/// # Errors
/// Returns `Error::Validation` under the same rules as [`create_collection`] and
/// `Error::NotFound` if the collection does not exist.
#[instrument(skip(db, text))]
pub async fn update_collection(
    db: &DatabaseConnection,
    collection_id: i64,
    title: &str,
    text: &str,
) -> Result<collection::Model> {
    let title = validate_title(title)?;
    validate_text(text)?;

    let mut collection: collection::ActiveModel =
        find_collection(db, collection_id).await?.into();
    ensure_title_free(db, &title, Some(collection_id)).await?;

    collection.title = Set(title);
    collection.text = Set(text.to_string());
    collection.updated_at = Set(now());
    let collection = collection.update(db).await?;
    debug!(collection_id, "Updated collection");
    Ok(collection)
}

/// Adds a product to a collection.
///
/// Returns `false` when the product was already part of the collection.
///
/// # Errors
/// Returns `Error::NotFound` if the collection does not exist and `Error::Reference` if
/// the product does not exist.
#[instrument(skip(db))]
pub async fn add_product_to_collection(
    db: &DatabaseConnection,
    collection_id: i64,
    product_id: i64,
) -> Result<bool> {
    let txn = db.begin().await?;
    let collection = find_collection(&txn, collection_id).await?;
    require_product(&txn, product_id).await?;

    if is_linked(&txn, collection_id, product_id).await? {
        return Ok(false);
    }
    link(&txn, collection_id, product_id).await?;
    touch(&txn, collection).await?;

    txn.commit().await?;
    debug!(collection_id, product_id, "Added product to collection");
    Ok(true)
}

/// Removes a product from a collection.
///
/// Returns `false` when the product was not part of the collection.
///
/// # Errors
/// Returns `Error::NotFound` if the collection does not exist.
#[instrument(skip(db))]
pub async fn remove_product_from_collection(
    db: &DatabaseConnection,
    collection_id: i64,
    product_id: i64,
) -> Result<bool> {
    let txn = db.begin().await?;
    let collection = find_collection(&txn, collection_id).await?;

    let result = CollectionProduct::delete_by_id((collection_id, product_id))
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        return Ok(false);
    }
    touch(&txn, collection).await?;

    txn.commit().await?;
    debug!(collection_id, product_id, "Removed product from collection");
    Ok(true)
}

/// Retrieves the products of a collection ordered by name.
///
/// # Errors
/// Returns `Error::NotFound` if the collection does not exist.
pub async fn get_collection_products(
    db: &DatabaseConnection,
    collection_id: i64,
) -> Result<Vec<product::Model>> {
    let collection = find_collection(db, collection_id).await?;
    collection
        .find_related(Product)
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the collections a product belongs to, ordered by title.
pub async fn get_product_collections(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Vec<collection::Model>> {
    let product = require_product(db, product_id).await?;
    product
        .find_related(Collection)
        .order_by_asc(collection::Column::Title)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a collection and its memberships. Member products are kept.
///
/// # Errors
/// Returns `Error::NotFound` if the collection does not exist.
#[instrument(skip(db))]
pub async fn delete_collection(db: &DatabaseConnection, collection_id: i64) -> Result<()> {
    let txn = db.begin().await?;
    let collection = find_collection(&txn, collection_id).await?;

    let memberships = CollectionProduct::delete_many()
        .filter(collection_product::Column::CollectionId.eq(collection_id))
        .exec(&txn)
        .await?
        .rows_affected;
    collection.delete(&txn).await?;

    txn.commit().await?;
    info!(collection_id, memberships, "Deleted collection");
    Ok(())
}
