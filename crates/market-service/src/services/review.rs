//! Review service
//!
//! One rating per completed order, written by the order's buyer.

use market_core::{DomainError, OrderStatus, Review, Uid};
use tracing::{info, instrument};

use crate::dto::{CreateReviewRequest, ReviewResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Review service
pub struct ReviewService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReviewService<'a> {
    /// Create a new ReviewService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a review for a completed order.
    ///
    /// Preconditions, in order: the order exists, the caller bought it,
    /// it is completed, and no review exists yet. The store's uniqueness
    /// constraint backs the last check against a concurrent insert.
    #[instrument(skip(self, request), fields(order_id = %order_id))]
    pub async fn create_review(
        &self,
        buyer_id: Uid,
        order_id: Uid,
        request: CreateReviewRequest,
    ) -> ServiceResult<ReviewResponse> {
        let order = self
            .ctx
            .order_repo()
            .find_by_id(order_id)
            .await?
            .ok_or(DomainError::OrderNotFound(order_id))?;

        if !order.is_bought_by(buyer_id) {
            return Err(ServiceError::permission_denied(
                "Not authorized to review this order",
            ));
        }

        if order.status != OrderStatus::Completed {
            return Err(DomainError::OrderNotCompleted.into());
        }

        if self
            .ctx
            .review_repo()
            .find_by_order(order_id)
            .await?
            .is_some()
        {
            return Err(DomainError::ReviewAlreadyExists.into());
        }

        if !Review::rating_in_range(request.rating) {
            return Err(DomainError::RatingOutOfRange.into());
        }

        // Reviews attach to the order's first line item
        let product_id = order.primary_product_id().ok_or(DomainError::EmptyOrder)?;

        let review = Review::new(
            self.ctx.generate_id(),
            product_id,
            buyer_id,
            order_id,
            request.rating,
            request.comment,
        );

        self.ctx.review_repo().create(&review).await?;

        info!(review_id = %review.id, order_id = %order_id, "Review created");

        Ok(ReviewResponse::from(&review))
    }
}
