//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize`; those carrying user input
//! also implement `Validate`. Prices arrive as decimal strings or numbers
//! and are range-checked in the services.

use chrono::{DateTime, Utc};
use market_core::{OrderStatus, PaymentMethod, Role};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// Account registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,

    /// buyer (default) or seller; admin is rejected
    pub role: Option<Role>,

    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Profile update request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: Option<String>,

    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Forgot-password request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Reset-password request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub token: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,
}

// ============================================================================
// Product Requests
// ============================================================================

/// Create product request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,

    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,

    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,

    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub discount_expires_at: Option<DateTime<Utc>>,

    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,

    #[validate(length(min = 1, message = "At least one image is required"))]
    pub images: Vec<String>,

    pub video: Option<String>,

    #[serde(default)]
    pub features: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    pub brand: Option<String>,

    #[serde(default)]
    pub featured: bool,
}

/// Update product request (partial)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, message = "Category is required"))]
    pub category: Option<String>,

    pub price: Option<Decimal>,
    pub discount_price: Option<Decimal>,
    pub discount_expires_at: Option<DateTime<Utc>>,

    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i32>,

    pub images: Option<Vec<String>>,
    pub video: Option<String>,
    pub features: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub brand: Option<String>,
    pub featured: Option<bool>,
    pub active: Option<bool>,
}

// ============================================================================
// Category Requests
// ============================================================================

/// Create category request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 2, message = "Category name must be at least 2 characters"))]
    pub name: String,

    pub description: Option<String>,
    pub image: Option<String>,

    #[serde(default = "default_true")]
    pub active: bool,
}

/// Update category request (partial)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 2, message = "Category name must be at least 2 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,
    pub image: Option<String>,
    pub active: Option<bool>,
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Order Requests
// ============================================================================

/// One requested line item
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemRequest {
    /// Product id as a string
    #[validate(length(min = 1, message = "Product ID is required"))]
    pub product_id: String,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

/// Create order request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "Order must have at least one item"), nested)]
    pub items: Vec<OrderItemRequest>,

    #[validate(length(min = 10, message = "Shipping address is required"))]
    pub shipping_address: String,

    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// Seller status transition request
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

// ============================================================================
// Review Requests
// ============================================================================

/// Create review request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,

    #[validate(length(max = 500, message = "Comment cannot exceed 500 characters"))]
    pub comment: Option<String>,
}

// ============================================================================
// Admin Requests
// ============================================================================

/// Ban / unban request
#[derive(Debug, Clone, Deserialize)]
pub struct BanRequest {
    pub banned: bool,
}
