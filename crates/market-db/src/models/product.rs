//! Product database model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Database model for the products table
#[derive(Debug, Clone, FromRow)]
pub struct ProductModel {
    pub id: i64,
    pub seller_id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub discount_expires_at: Option<DateTime<Utc>>,
    pub stock: i32,
    pub active: bool,
    pub images: Vec<String>,
    pub video: Option<String>,
    pub features: Vec<String>,
    pub tags: Vec<String>,
    pub brand: Option<String>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
