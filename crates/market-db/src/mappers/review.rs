//! Review entity <-> model mapper

use market_core::{Review, Uid};

use crate::models::ReviewModel;

impl From<ReviewModel> for Review {
    fn from(model: ReviewModel) -> Self {
        Review {
            id: Uid::new(model.id),
            product_id: Uid::new(model.product_id),
            buyer_id: Uid::new(model.buyer_id),
            order_id: Uid::new(model.order_id),
            rating: model.rating,
            comment: model.comment,
            created_at: model.created_at,
        }
    }
}
