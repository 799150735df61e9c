//! Review entity - one rating per completed order

use chrono::{DateTime, Utc};

use crate::value_objects::Uid;

/// Maximum comment length in characters
pub const MAX_COMMENT_LEN: usize = 500;

/// A buyer's review of a completed order, attached to the order's primary
/// product. At most one review exists per order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: Uid,
    pub product_id: Uid,
    pub buyer_id: Uid,
    pub order_id: Uid,
    /// 1-5 inclusive
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(
        id: Uid,
        product_id: Uid,
        buyer_id: Uid,
        order_id: Uid,
        rating: i16,
        comment: Option<String>,
    ) -> Self {
        Self {
            id,
            product_id,
            buyer_id,
            order_id,
            rating,
            comment,
            created_at: Utc::now(),
        }
    }

    /// Whether the rating is inside the 1-5 range
    #[inline]
    pub fn rating_in_range(rating: i16) -> bool {
        (1..=5).contains(&rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_range() {
        assert!(!Review::rating_in_range(0));
        assert!(Review::rating_in_range(1));
        assert!(Review::rating_in_range(5));
        assert!(!Review::rating_in_range(6));
    }

    #[test]
    fn test_construction() {
        let review = Review::new(
            Uid::new(1),
            Uid::new(2),
            Uid::new(3),
            Uid::new(4),
            4,
            Some("Arrived quickly".to_string()),
        );
        assert_eq!(review.rating, 4);
        assert_eq!(review.order_id, Uid::new(4));
    }
}
