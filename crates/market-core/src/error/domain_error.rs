//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{OrderStatus, Uid};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Account not found: {0}")]
    AccountNotFound(Uid),

    #[error("Product not found: {0}")]
    ProductNotFound(Uid),

    #[error("Category not found: {0}")]
    CategoryNotFound(Uid),

    #[error("Order not found: {0}")]
    OrderNotFound(Uid),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Rating must be between 1 and 5")]
    RatingOutOfRange,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not the owner of this resource")]
    NotResourceOwner,

    #[error("Account has been banned")]
    AccountBanned,

    #[error("Admin accounts cannot be banned")]
    CannotBanAdmin,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("Category with this name already exists")]
    CategoryNameExists,

    #[error("Category slug already exists")]
    SlugExists,

    #[error("Order number already exists")]
    OrderNumberExists,

    #[error("Review already exists for this order")]
    ReviewAlreadyExists,

    #[error("Category is still referenced by {count} product(s)")]
    CategoryInUse { count: i64 },

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Product is not available: {0}")]
    ProductInactive(String),

    #[error("Insufficient stock for {0}")]
    InsufficientStock(String),

    #[error("All products must be from the same seller")]
    MixedSellers,

    #[error("Order must have at least one item")]
    EmptyOrder,

    #[error("Cannot change order status from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    #[error("Can only review completed orders")]
    OrderNotCompleted,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::AccountNotFound(_) => "UNKNOWN_ACCOUNT",
            Self::ProductNotFound(_) => "UNKNOWN_PRODUCT",
            Self::CategoryNotFound(_) => "UNKNOWN_CATEGORY",
            Self::OrderNotFound(_) => "UNKNOWN_ORDER",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::RatingOutOfRange => "RATING_OUT_OF_RANGE",

            // Authorization
            Self::NotResourceOwner => "NOT_RESOURCE_OWNER",
            Self::AccountBanned => "ACCOUNT_BANNED",
            Self::CannotBanAdmin => "CANNOT_BAN_ADMIN",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::CategoryNameExists => "CATEGORY_NAME_EXISTS",
            Self::SlugExists => "SLUG_EXISTS",
            Self::OrderNumberExists => "ORDER_NUMBER_EXISTS",
            Self::ReviewAlreadyExists => "REVIEW_ALREADY_EXISTS",
            Self::CategoryInUse { .. } => "CATEGORY_IN_USE",

            // Business Rules
            Self::ProductInactive(_) => "PRODUCT_INACTIVE",
            Self::InsufficientStock(_) => "INSUFFICIENT_STOCK",
            Self::MixedSellers => "MIXED_SELLERS",
            Self::EmptyOrder => "EMPTY_ORDER",
            Self::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::OrderNotCompleted => "ORDER_NOT_COMPLETED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::AccountNotFound(_)
                | Self::ProductNotFound(_)
                | Self::CategoryNotFound(_)
                | Self::OrderNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::RatingOutOfRange)
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotResourceOwner | Self::AccountBanned | Self::CannotBanAdmin
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::EmailAlreadyExists
                | Self::CategoryNameExists
                | Self::SlugExists
                | Self::OrderNumberExists
                | Self::ReviewAlreadyExists
                | Self::CategoryInUse { .. }
        )
    }

    /// Check if this is a business-rule violation (mapped to 400)
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            Self::ProductInactive(_)
                | Self::InsufficientStock(_)
                | Self::MixedSellers
                | Self::EmptyOrder
                | Self::InvalidStatusTransition { .. }
                | Self::OrderNotCompleted
        )
    }
}
