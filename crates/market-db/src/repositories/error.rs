//! Error handling utilities for repositories

use market_core::{DomainError, Uid};
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Map a unique violation by the constraint it hit, for tables carrying
/// more than one unique index (categories: name and slug).
pub fn map_unique_violation_by_constraint<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce(&str) -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique(db_err.constraint().unwrap_or_default());
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Create an "account not found" error
pub fn account_not_found(id: Uid) -> DomainError {
    DomainError::AccountNotFound(id)
}

/// Create a "product not found" error
pub fn product_not_found(id: Uid) -> DomainError {
    DomainError::ProductNotFound(id)
}

/// Create a "category not found" error
pub fn category_not_found(id: Uid) -> DomainError {
    DomainError::CategoryNotFound(id)
}

/// Create an "order not found" error
pub fn order_not_found(id: Uid) -> DomainError {
    DomainError::OrderNotFound(id)
}
