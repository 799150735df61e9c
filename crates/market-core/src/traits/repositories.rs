//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs; the infrastructure layer
//! provides the implementation. All store handles are constructed at
//! startup and injected - there are no ambient singletons.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::entities::{Account, Category, Order, Product, Review};
use crate::error::DomainError;
use crate::value_objects::{OrderStatus, Role, Uid};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Offset pagination window (1-based page)
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, 100),
        }
    }

    /// Row offset for SQL queries
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// Filters for public product listing
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub tag: Option<String>,
    pub featured: Option<bool>,
}

/// Per-status order count and amount, for dashboards
#[derive(Debug, Clone)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
    pub total_amount: Decimal,
}

/// Revenue aggregate over completed orders
#[derive(Debug, Clone, Default)]
pub struct RevenueStats {
    pub total_revenue: Decimal,
    pub average_order_value: Decimal,
    pub completed_orders: i64,
}

/// A best-selling product, by units sold
#[derive(Debug, Clone)]
pub struct TopProduct {
    pub product_id: Uid,
    pub title: String,
    pub image: Option<String>,
    pub quantity_sold: i64,
    pub revenue: Decimal,
}

// ============================================================================
// Account Repository
// ============================================================================

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by ID
    async fn find_by_id(&self, id: Uid) -> RepoResult<Option<Account>>;

    /// Find account by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Create a new account
    async fn create(&self, account: &Account, password_hash: &str) -> RepoResult<()>;

    /// Update profile fields (name, phone, address)
    async fn update(&self, account: &Account) -> RepoResult<()>;

    /// Set or clear the ban flag
    async fn set_banned(&self, id: Uid, banned: bool) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Uid) -> RepoResult<Option<String>>;

    /// Update password hash
    async fn update_password(&self, id: Uid, password_hash: &str) -> RepoResult<()>;

    /// Store a password-reset token digest with its expiry
    async fn set_reset_token(
        &self,
        id: Uid,
        token_digest: &str,
        expires_at: DateTime<Utc>,
    ) -> RepoResult<()>;

    /// Find the account holding an unexpired reset token digest
    async fn find_by_reset_token(&self, token_digest: &str) -> RepoResult<Option<Account>>;

    /// Clear any outstanding reset token
    async fn clear_reset_token(&self, id: Uid) -> RepoResult<()>;

    /// List accounts, optionally filtered by role, newest first
    async fn list(&self, role: Option<Role>, page: Page) -> RepoResult<(Vec<Account>, i64)>;

    /// Count accounts, optionally by role
    async fn count(&self, role: Option<Role>) -> RepoResult<i64>;
}

// ============================================================================
// Product Repository
// ============================================================================

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find product by ID
    async fn find_by_id(&self, id: Uid) -> RepoResult<Option<Product>>;

    /// Create a new product
    async fn create(&self, product: &Product) -> RepoResult<()>;

    /// Update an existing product
    async fn update(&self, product: &Product) -> RepoResult<()>;

    /// Hard delete a product
    async fn delete(&self, id: Uid) -> RepoResult<()>;

    /// List active products with filters, newest first
    async fn list_active(&self, filter: &ProductFilter, page: Page)
        -> RepoResult<(Vec<Product>, i64)>;

    /// Free-text search over title, description, and tags (active only)
    async fn search(&self, query: &str, page: Page) -> RepoResult<(Vec<Product>, i64)>;

    /// List a seller's products, optionally filtered by active flag
    async fn list_by_seller(
        &self,
        seller_id: Uid,
        active: Option<bool>,
        page: Page,
    ) -> RepoResult<(Vec<Product>, i64)>;

    /// Count a seller's products, optionally by active flag
    async fn count_by_seller(&self, seller_id: Uid, active: Option<bool>) -> RepoResult<i64>;

    /// Count products referencing a category name (deletion guard)
    async fn count_by_category_name(&self, category_name: &str) -> RepoResult<i64>;

    /// Total product count
    async fn count(&self) -> RepoResult<i64>;
}

// ============================================================================
// Category Repository
// ============================================================================

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Find category by ID
    async fn find_by_id(&self, id: Uid) -> RepoResult<Option<Category>>;

    /// Find category by name, case-insensitively
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>>;

    /// Check whether a slug is taken
    async fn slug_exists(&self, slug: &str) -> RepoResult<bool>;

    /// Create a new category; unique violations surface as
    /// `CategoryNameExists` / `SlugExists`
    async fn create(&self, category: &Category) -> RepoResult<()>;

    /// Update an existing category
    async fn update(&self, category: &Category) -> RepoResult<()>;

    /// Hard delete a category
    async fn delete(&self, id: Uid) -> RepoResult<()>;

    /// List all categories, optionally by active flag, name-ordered
    async fn list(&self, active: Option<bool>) -> RepoResult<Vec<Category>>;

    /// List a seller's categories, optionally by active flag
    async fn list_by_owner(&self, owner_id: Uid, active: Option<bool>)
        -> RepoResult<Vec<Category>>;
}

// ============================================================================
// Order Repository
// ============================================================================

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist an order and decrement stock for every line item as one
    /// transaction. The per-item decrement is conditional (only applied
    /// when remaining stock covers the quantity); if any item cannot be
    /// covered the whole transaction rolls back with
    /// `InsufficientStock`. A duplicate order number rolls back with
    /// `OrderNumberExists` so the caller can regenerate and retry.
    async fn create(&self, order: &Order) -> RepoResult<()>;

    /// Find order by ID
    async fn find_by_id(&self, id: Uid) -> RepoResult<Option<Order>>;

    /// Persist a status change
    async fn update_status(&self, id: Uid, status: OrderStatus) -> RepoResult<()>;

    /// List a buyer's orders, optionally by status, newest first
    async fn list_by_buyer(
        &self,
        buyer_id: Uid,
        status: Option<OrderStatus>,
        page: Page,
    ) -> RepoResult<(Vec<Order>, i64)>;

    /// List a seller's orders, optionally by status, newest first
    async fn list_by_seller(
        &self,
        seller_id: Uid,
        status: Option<OrderStatus>,
        page: Page,
    ) -> RepoResult<(Vec<Order>, i64)>;

    /// Count orders, optionally scoped to one seller
    async fn count(&self, seller_id: Option<Uid>) -> RepoResult<i64>;

    /// Order count and amount per status, optionally scoped to one seller
    async fn status_breakdown(&self, seller_id: Option<Uid>) -> RepoResult<Vec<StatusCount>>;

    /// Revenue aggregates over completed orders, optionally scoped
    async fn revenue_stats(&self, seller_id: Option<Uid>) -> RepoResult<RevenueStats>;

    /// Best-selling products by units, optionally scoped to one seller
    async fn top_products(&self, seller_id: Option<Uid>, limit: i64)
        -> RepoResult<Vec<TopProduct>>;

    /// Most recent orders, optionally scoped to one seller
    async fn recent(&self, seller_id: Option<Uid>, limit: i64) -> RepoResult<Vec<Order>>;
}

// ============================================================================
// Review Repository
// ============================================================================

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Create a review; the store's uniqueness constraint on the order
    /// reference surfaces as `ReviewAlreadyExists`, closing the race
    /// between existence check and insert.
    async fn create(&self, review: &Review) -> RepoResult<()>;

    /// Find the review attached to an order, if any
    async fn find_by_order(&self, order_id: Uid) -> RepoResult<Option<Review>>;

    /// List a product's reviews, newest first
    async fn list_by_product(&self, product_id: Uid) -> RepoResult<Vec<Review>>;
}
