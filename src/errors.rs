//! Unified error types for the shop data model.
//!
//! Field constraint failures, dangling references and store-level integrity failures are
//! kept apart so callers can tell a bad request from a broken database.

use crate::entities::order::OrderStatus;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// All errors produced by the store operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A field constraint was violated (length, emptiness, uniqueness, numeric range)
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: &'static str,
        /// Human readable reason
        message: String,
    },

    /// A foreign key points at a row that does not exist
    #[error("Referenced {entity} with id {id} does not exist")]
    Reference {
        /// Referenced entity name
        entity: &'static str,
        /// Referenced id
        id: i64,
    },

    /// The row targeted by an update or delete does not exist
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Entity name
        entity: &'static str,
        /// Requested id
        id: i64,
    },

    /// Order status change rejected by the strict order policy
    #[error("Order status cannot change from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status
        from: OrderStatus,
        /// Requested status
        to: OrderStatus,
    },

    /// Constraint violation reported by the store itself
    #[error("Integrity error: {message}")]
    Integrity {
        /// Message reported by the backend
        message: String,
    },

    /// Configuration file or environment problem
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// Any other database error
    #[error("Database error: {0}")]
    Database(DbErr),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] value.
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) => Self::Validation {
                field: unique_field(&message),
                message,
            },
            Some(SqlErr::ForeignKeyConstraintViolation(message)) => Self::Integrity { message },
            _ => Self::Database(err),
        }
    }
}

/// Field named by a unique-constraint message such as
/// `UNIQUE constraint failed: products.name`.
///
/// Columns without a dedicated field name (composite keys included) map to `"unique"`.
fn unique_field(message: &str) -> &'static str {
    match message.rsplit(['.', ' ']).next().unwrap_or_default() {
        "name" => "name",
        "title" => "title",
        "username" => "username",
        _ => "unique",
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
