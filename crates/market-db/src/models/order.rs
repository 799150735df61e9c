//! Order database models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Database model for the orders table
#[derive(Debug, Clone, FromRow)]
pub struct OrderModel {
    pub id: i64,
    pub order_number: String,
    pub buyer_id: i64,
    pub seller_id: i64,
    pub total_amount: Decimal,
    pub shipping_address: String,
    pub payment_method: String,
    pub payment_status: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for the order_items table
#[derive(Debug, Clone, FromRow)]
pub struct OrderItemModel {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
}
