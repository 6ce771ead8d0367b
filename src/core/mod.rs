//! Core store operations - framework-agnostic logic for every table.
//!
//! Each submodule owns the writes for one component. Operations touching more than one
//! row run inside a single database transaction.

pub mod collection;
pub mod order;
pub mod product;
pub mod review;
pub mod seed;
pub mod user;

/// Current timestamp in the form stored in `created_at`/`updated_at` columns.
pub(crate) fn now() -> sea_orm::prelude::DateTime {
    chrono::Utc::now().naive_utc()
}
