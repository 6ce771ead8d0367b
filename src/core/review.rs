//! Review business logic.
//!
//! A review ties one user to one product with a text and a rating from 1 to 5. Reviews
//! disappear together with their product or their author.

use crate::{
    core::{now, product::require_product, user::require_user},
    entities::{Review, review},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info, instrument};

fn validate_review(text: &str, rating: i32) -> Result<()> {
    if !(review::MIN_RATING..=review::MAX_RATING).contains(&rating) {
        return Err(Error::validation(
            "rating",
            format!(
                "Rating must be between {} and {} (got {rating})",
                review::MIN_RATING,
                review::MAX_RATING
            ),
        ));
    }
    if text.trim().is_empty() {
        return Err(Error::validation("text", "Review text cannot be empty"));
    }
    Ok(())
}

/// Creates a review of `product_id` written by `user_id`.
///
/// # Errors
/// Returns `Error::Validation` if the rating is outside 1..=5 or the text is empty, and
/// `Error::Reference` if the user or the product does not exist.
#[instrument(skip(db, text))]
pub async fn create_review(
    db: &DatabaseConnection,
    user_id: i64,
    product_id: i64,
    text: &str,
    rating: i32,
) -> Result<review::Model> {
    validate_review(text, rating)?;
    require_user(db, user_id).await?;
    require_product(db, product_id).await?;

    let now = now();
    let review = review::ActiveModel {
        user_id: Set(user_id),
        product_id: Set(product_id),
        text: Set(text.to_string()),
        rating: Set(rating),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(review_id = review.id, "Created review");
    Ok(review)
}

/// Retrieves a review by id.
pub async fn get_review_by_id(
    db: &DatabaseConnection,
    review_id: i64,
) -> Result<Option<review::Model>> {
    Review::find_by_id(review_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the reviews of a product, newest first.
pub async fn get_reviews_for_product(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Vec<review::Model>> {
    Review::find()
        .filter(review::Column::ProductId.eq(product_id))
        .order_by_desc(review::Column::CreatedAt)
        .order_by_desc(review::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the reviews written by a user, newest first.
pub async fn get_reviews_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<review::Model>> {
    Review::find()
        .filter(review::Column::UserId.eq(user_id))
        .order_by_desc(review::Column::CreatedAt)
        .order_by_desc(review::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Replaces the text and rating of a review.
///
/// # Errors
/// Returns `Error::Validation` under the same rules as [`create_review`] and
/// `Error::NotFound` if the review does not exist.
#[instrument(skip(db, text))]
pub async fn update_review(
    db: &DatabaseConnection,
    review_id: i64,
    text: &str,
    rating: i32,
) -> Result<review::Model> {
    validate_review(text, rating)?;

    let mut review: review::ActiveModel = Review::find_by_id(review_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "review",
            id: review_id,
        })?
        .into();
    review.text = Set(text.to_string());
    review.rating = Set(rating);
    review.updated_at = Set(now());

    let review = review.update(db).await?;
    debug!(review_id, "Updated review");
    Ok(review)
}

/// Deletes a review.
///
/// # Errors
/// Returns `Error::NotFound` if the review does not exist.
#[instrument(skip(db))]
pub async fn delete_review(db: &DatabaseConnection, review_id: i64) -> Result<()> {
    let result = Review::delete_by_id(review_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "review",
            id: review_id,
        });
    }
    info!(review_id, "Deleted review");
    Ok(())
}
