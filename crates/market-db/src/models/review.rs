//! Review database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the reviews table
#[derive(Debug, Clone, FromRow)]
pub struct ReviewModel {
    pub id: i64,
    pub product_id: i64,
    pub buyer_id: i64,
    pub order_id: i64,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}
