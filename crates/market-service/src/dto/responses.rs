//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize`. Entity ids are serialized as
//! strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use market_core::{OrderStatus, PaymentMethod, PaymentStatus, Role};
use rust_decimal::Decimal;
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Offset-paginated collection with its metadata
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PageMeta,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, limit: i64) -> Self {
        let pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        Self {
            items,
            pagination: PageMeta {
                total,
                page,
                limit,
                pages,
            },
        }
    }
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
}

// ============================================================================
// Auth / Account Responses
// ============================================================================

/// Account profile response
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub banned: bool,
    pub created_at: DateTime<Utc>,
}

/// Authentication response with tokens
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub account: AccountResponse,
}

impl AuthResponse {
    pub fn new(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        account: AccountResponse,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
            account,
        }
    }
}

// ============================================================================
// Product Responses
// ============================================================================

/// Full product response
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub seller_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_expires_at: Option<DateTime<Utc>>,
    /// The price currently charged (discount applied when valid)
    pub effective_price: Decimal,
    pub stock: i32,
    pub active: bool,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    pub features: Vec<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact product reference used inside order line items
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub price: Decimal,
}

// ============================================================================
// Category Responses
// ============================================================================

/// Category response
#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub active: bool,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Order Responses
// ============================================================================

/// One line item inside an order response
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub quantity: i32,
    /// Unit price snapshotted at purchase time
    pub unit_price: Decimal,
    pub line_total: Decimal,
    /// Live product reference, when the product still exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductSummary>,
}

/// Full order response
#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub order_number: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub items: Vec<OrderItemResponse>,
    pub total_amount: Decimal,
    pub shipping_address: String,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Review Responses
// ============================================================================

/// Review response
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub id: String,
    pub product_id: String,
    pub buyer_id: String,
    pub order_id: String,
    pub rating: i16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Dashboard Responses
// ============================================================================

/// Per-status order count
#[derive(Debug, Clone, Serialize)]
pub struct StatusCountResponse {
    pub status: OrderStatus,
    pub count: i64,
    pub total_amount: Decimal,
}

/// Best-selling product
#[derive(Debug, Clone, Serialize)]
pub struct TopProductResponse {
    pub product_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub quantity_sold: i64,
    pub revenue: Decimal,
}

/// Seller dashboard headline numbers
#[derive(Debug, Clone, Serialize)]
pub struct SellerStats {
    pub total_products: i64,
    pub active_products: i64,
    pub total_orders: i64,
    pub total_revenue: Decimal,
    pub average_order_value: Decimal,
    pub completed_orders: i64,
}

/// Seller dashboard response
#[derive(Debug, Serialize)]
pub struct SellerDashboardResponse {
    pub stats: SellerStats,
    pub status_breakdown: Vec<StatusCountResponse>,
    pub top_products: Vec<TopProductResponse>,
    pub recent_orders: Vec<OrderResponse>,
}

/// Admin dashboard headline numbers
#[derive(Debug, Clone, Serialize)]
pub struct AdminStats {
    pub total_accounts: i64,
    pub total_sellers: i64,
    pub total_buyers: i64,
    pub total_products: i64,
    pub total_orders: i64,
    pub total_revenue: Decimal,
    pub average_order_value: Decimal,
    pub completed_orders: i64,
}

/// Admin dashboard response
#[derive(Debug, Serialize)]
pub struct AdminDashboardResponse {
    pub stats: AdminStats,
    pub status_breakdown: Vec<StatusCountResponse>,
    pub top_products: Vec<TopProductResponse>,
    pub recent_orders: Vec<OrderResponse>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Liveness response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self { status: "ok" }
    }
}

/// Readiness response with dependency health
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub database: bool,
}

impl ReadinessResponse {
    pub fn new(database: bool) -> Self {
        Self {
            ready: database,
            database,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginated_page_count() {
        let paginated = Paginated::new(vec![1, 2, 3], 25, 1, 10);
        assert_eq!(paginated.pagination.pages, 3);

        let paginated = Paginated::new(Vec::<i32>::new(), 0, 1, 10);
        assert_eq!(paginated.pagination.pages, 0);

        let paginated = Paginated::new(vec![1], 10, 1, 10);
        assert_eq!(paginated.pagination.pages, 1);
    }

    #[test]
    fn test_health_response() {
        let response = HealthResponse::healthy();
        assert_eq!(response.status, "ok");
    }

    #[test]
    fn test_readiness_follows_database() {
        assert!(ReadinessResponse::new(true).ready);
        assert!(!ReadinessResponse::new(false).ready);
    }
}
