//! Order entity - the central workflow record
//!
//! Orders are created atomically with the stock decrement and keep price
//! snapshots; later product changes never affect an existing order.

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;

use crate::value_objects::{OrderStatus, PaymentMethod, PaymentStatus, Uid};

/// A single (product, quantity, snapshotted price) tuple within an order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub product_id: Uid,
    pub quantity: i32,
    /// Effective unit price captured at purchase time
    pub unit_price: Decimal,
}

impl OrderItem {
    pub fn new(product_id: Uid, quantity: i32, unit_price: Decimal) -> Self {
        Self {
            product_id,
            quantity,
            unit_price,
        }
    }

    /// Line total: snapshotted unit price x quantity
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A placed order. Buyer, seller, items, and total are immutable after
/// creation; only `status` moves, and only at the seller's hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: Uid,
    pub order_number: String,
    pub buyer_id: Uid,
    pub seller_id: Uid,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub shipping_address: String,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Create a new pending order. The total is computed once from the
    /// line items and never recomputed afterwards.
    pub fn new(
        id: Uid,
        order_number: String,
        buyer_id: Uid,
        seller_id: Uid,
        items: Vec<OrderItem>,
        shipping_address: String,
        payment_method: PaymentMethod,
    ) -> Self {
        let now = Utc::now();
        let total_amount = items.iter().map(OrderItem::line_total).sum();
        Self {
            id,
            order_number,
            buyer_id,
            seller_id,
            items,
            total_amount,
            shipping_address,
            payment_method,
            payment_status: PaymentStatus::Pending,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_sold_by(&self, seller_id: Uid) -> bool {
        self.seller_id == seller_id
    }

    #[inline]
    pub fn is_bought_by(&self, buyer_id: Uid) -> bool {
        self.buyer_id == buyer_id
    }

    /// The product a review for this order attaches to (first line item)
    pub fn primary_product_id(&self) -> Option<Uid> {
        self.items.first().map(|item| item.product_id)
    }
}

/// Generate an order number: `ORD-<base36 millis>-<6 random alphanumerics>`,
/// upper-cased. Collisions are negligible but still caught by the store's
/// unique constraint; callers regenerate on conflict.
pub fn generate_order_number() -> String {
    let millis = Utc::now().timestamp_millis();
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| {
            let chars = b"0123456789abcdefghijklmnopqrstuvwxyz";
            chars[rng.gen_range(0..chars.len())] as char
        })
        .collect();

    format!("ORD-{}-{}", to_base36(millis), suffix).to_uppercase()
}

fn to_base36(mut value: i64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value <= 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("base36 digits are ascii")
}
