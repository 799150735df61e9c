//! Product entity - a seller-owned catalog listing

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::value_objects::Uid;

/// Catalog product. `seller_id` is immutable after creation; all mutation
/// is gated on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: Uid,
    pub seller_id: Uid,
    pub title: String,
    pub description: String,
    /// Category name, a soft reference to `Category::name`
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

impl Product {
    /// Create a new Product with required fields
    pub fn new(
        id: Uid,
        seller_id: Uid,
        title: String,
        description: String,
        category: String,
        price: Decimal,
        stock: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            seller_id,
            title,
            description,
            category,
            price,
            discount_price: None,
            discount_expires_at: None,
            stock,
            active: true,
            images: Vec::new(),
            video: None,
            features: Vec::new(),
            tags: Vec::new(),
            brand: None,
            featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check ownership
    #[inline]
    pub fn is_owned_by(&self, seller_id: Uid) -> bool {
        self.seller_id == seller_id
    }

    /// Whether the discount applies at the given instant: it must be set,
    /// strictly below the base price, and not past its expiry.
    pub fn discount_active_at(&self, now: DateTime<Utc>) -> bool {
        match self.discount_price {
            Some(discount) if discount < self.price => {
                self.discount_expires_at.is_none_or(|expires| expires > now)
            }
            _ => false,
        }
    }

    /// The price actually charged at the given instant.
    pub fn effective_price_at(&self, now: DateTime<Utc>) -> Decimal {
        if self.discount_active_at(now) {
            self.discount_price.unwrap_or(self.price)
        } else {
            self.price
        }
    }

    /// Whether the requested quantity can currently be fulfilled
    #[inline]
    pub fn has_stock(&self, quantity: i32) -> bool {
        self.stock >= quantity
    }
}
